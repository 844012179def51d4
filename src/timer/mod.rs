mod state;

pub use state::IntervalTimer;
