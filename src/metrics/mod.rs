mod export;
mod store;
mod tracker;
mod types;

pub use export::{export_file_name, ExportSink, FileExporter};
pub use store::MetricsStore;
pub use tracker::MetricsTracker;
pub use types::{ChallengeRecord, MetricsSnapshot, MetricsState};
