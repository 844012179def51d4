pub mod clock;
pub mod commands;
pub mod db;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod mission;
pub mod models;
pub mod settings;
pub mod storage;
pub mod timer;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;

use clock::SystemClock;
use commands::{dispatch, Cli};
use db::Database;
use metrics::{FileExporter, MetricsTracker};
use settings::{debug_enabled, resolve_data_dir, TrackerSettings};

/// Long-lived handles for one run of the tracker.
pub struct AppState {
    pub db: Database,
    pub tracker: MetricsTracker,
    pub settings: TrackerSettings,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn open(settings: TrackerSettings, export_override: Option<PathBuf>) -> Result<Self> {
        let database = Database::new(settings.database_path())?;
        let export_dir = export_override.unwrap_or_else(|| settings.export_dir().to_path_buf());

        let tracker = MetricsTracker::new(
            Arc::new(database.clone()),
            Arc::new(SystemClock),
            Arc::new(FileExporter::new(export_dir.clone())),
        );

        Ok(Self {
            db: database,
            tracker,
            settings,
            export_dir,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (reads RUST_LOG env var)
    let level = if debug_enabled() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let data_dir = resolve_data_dir(cli.data_dir.clone());
    log::debug!("Using data directory {}", data_dir.display());

    let settings = TrackerSettings::load(data_dir)?;
    let state = AppState::open(settings, cli.command.export_override())?;

    dispatch(&state, &cli.command)
}
