use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{Context, Result};

use crate::{
    clock::Clock,
    identity::{IdentityStore, SessionId},
    log_error, log_info, log_warn,
    models::{Difficulty, Mode, QuestionId},
    storage::{KeyValueStore, PROFILE_KEY},
    timer::IntervalTimer,
};

use super::{
    export::{export_file_name, ExportSink},
    store::MetricsStore,
    types::{MetricsSnapshot, MetricsState},
};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "bitvoyager::metrics";

struct TrackerState {
    session_id: SessionId,
    store: MetricsStore,
    timer: IntervalTimer,
}

/// Session metrics handle shared by the mission flow and any UI affordance.
///
/// Built once at startup and cloned into every consumer; all clones see the
/// same document and the same interval timer.
#[derive(Clone)]
pub struct MetricsTracker {
    inner: Arc<Mutex<TrackerState>>,
    identity: IdentityStore,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    exporter: Arc<dyn ExportSink>,
}

impl MetricsTracker {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        exporter: Arc<dyn ExportSink>,
    ) -> Self {
        let identity = IdentityStore::new(storage.clone(), clock.clone());
        let session_id = identity.get_or_create_session_id();
        let store = MetricsStore::load(storage.clone(), clock.clone(), &session_id);

        log_info!("Tracking session {session_id}");

        Self {
            inner: Arc::new(Mutex::new(TrackerState {
                session_id,
                store,
                timer: IntervalTimer::new(),
            })),
            identity,
            storage,
            clock,
            exporter,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session_id(&self) -> SessionId {
        self.lock().session_id.clone()
    }

    pub fn metrics(&self) -> MetricsState {
        self.lock().store.state().clone()
    }

    pub fn interval_running(&self) -> bool {
        self.lock().timer.is_running()
    }

    /// Start timing a mode given by name. Unknown names are reported and
    /// otherwise ignored.
    pub fn start_mode(&self, mode: &str) -> Option<Mode> {
        match mode.parse::<Mode>() {
            Ok(mode) => {
                self.begin_mode(mode);
                Some(mode)
            }
            Err(err) => {
                log_error!("{err}");
                None
            }
        }
    }

    pub fn begin_mode(&self, mode: Mode) {
        let now = self.clock.timestamp();
        self.lock().timer.mark_start(now);
        log_info!("Started {mode} mode");
    }

    pub fn complete_mode(&self) {
        self.lock().timer.clear();
        log_info!("Mode completed");
    }

    /// Restart the challenge clock without recording anything.
    pub fn start_challenge(&self) {
        let now = self.clock.timestamp();
        self.lock().timer.mark_start(now);
    }

    pub fn record_attempt(&self, success: bool) {
        self.lock().store.record_attempt(success);
    }

    pub fn record_skip(&self) {
        self.lock().store.record_skip();
    }

    /// Record a completed challenge timed from the last interval start. The
    /// next challenge's clock starts at this same instant.
    pub fn record_challenge_completion(
        &self,
        challenge_id: QuestionId,
        difficulty: Difficulty,
        attempts: u32,
    ) {
        let now = self.clock.timestamp();
        let mut state = self.lock();
        if !state.timer.is_running() {
            log_warn!("Challenge {challenge_id} completed with no interval running");
        }
        let time_spent = state.timer.mark_end(now);
        state
            .store
            .append_challenge(challenge_id, difficulty, attempts, time_spent, now);
        state.timer.mark_start(now);
    }

    pub fn get_metrics_data(&self) -> MetricsSnapshot {
        let now = self.clock.timestamp();
        self.lock().store.snapshot(now)
    }

    /// Build a snapshot and offer it as a download. The snapshot is returned
    /// whether or not delivery worked.
    pub fn export_metrics(&self) -> MetricsSnapshot {
        let snapshot = self.get_metrics_data();
        match self.deliver(&snapshot) {
            Ok(path) => log_info!("Exported metrics to {}", path.display()),
            Err(err) => log_error!("Failed to export metrics: {err:#}"),
        }
        snapshot
    }

    /// Like `export_metrics`, but reports where the export landed or why it
    /// did not.
    pub fn try_export_metrics(&self) -> Result<(MetricsSnapshot, PathBuf)> {
        let snapshot = self.get_metrics_data();
        let path = self.deliver(&snapshot)?;
        Ok((snapshot, path))
    }

    fn deliver(&self, snapshot: &MetricsSnapshot) -> Result<PathBuf> {
        let file_name = export_file_name(&self.session_id());
        let contents = serde_json::to_string_pretty(snapshot)
            .context("failed to serialize metrics export")?;
        self.exporter
            .deliver(&file_name, &contents)
            .with_context(|| format!("failed to deliver {file_name}"))
    }

    /// Start a brand-new session with zeroed counters.
    pub fn reset_metrics(&self) -> SessionId {
        let session_id = self.identity.regenerate();
        let mut state = self.lock();
        state.store.reset(session_id.clone());
        state.session_id = session_id.clone();
        log_info!("Metrics reset, new session {session_id}");
        session_id
    }

    /// Forget everything recorded on this device, including the learning
    /// profile, and continue as a first-time participant.
    pub fn reset_study(&self) -> SessionId {
        if let Err(err) = self.storage.remove(PROFILE_KEY) {
            log_warn!("Failed to remove learning profile: {err:#}");
        }

        let mut state = self.lock();
        self.identity.clear();
        state.store.clear();

        let session_id = self.identity.get_or_create_session_id();
        state.store.reset(session_id.clone());
        state.session_id = session_id.clone();
        state.timer.clear();
        log_info!("Study reset, new session {session_id}");
        session_id
    }
}
