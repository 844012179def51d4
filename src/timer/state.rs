use chrono::{DateTime, Utc};

/// Start of the interval currently being timed (a mode or a challenge).
///
/// Lives outside the persisted metrics document so that nothing is written
/// while time merely passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalTimer {
    started_at: Option<DateTime<Utc>>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn mark_start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
    }

    /// Seconds since the last `mark_start`, or `0.0` when nothing is running.
    /// A clock that went backwards also reads as `0.0`.
    pub fn mark_end(&self, now: DateTime<Utc>) -> f64 {
        match self.started_at {
            Some(anchor) => {
                let elapsed_ms = (now - anchor).num_milliseconds().max(0);
                elapsed_ms as f64 / 1000.0
            }
            None => 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }
}
