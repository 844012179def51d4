use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    clock::Clock,
    identity::SessionId,
    log_debug, log_error, log_warn,
    models::{Difficulty, QuestionId},
    storage::{KeyValueStore, METRICS_KEY},
};

use super::types::{ChallengeRecord, MetricsSnapshot, MetricsState};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "bitvoyager::metrics";

/// Owns the authoritative metrics document. Every mutation swaps in a new
/// document and writes it out in full before returning.
pub struct MetricsStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    state: MetricsState,
}

impl MetricsStore {
    /// Load the stored document, or start a fresh one when there is none or
    /// it cannot be used.
    pub fn load(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        session_id: &SessionId,
    ) -> Self {
        let state = match read_state(storage.as_ref()) {
            Some(state) => {
                log_debug!(
                    "Loaded metrics for {} ({} attempts, {} completed)",
                    state.session_id,
                    state.attempts,
                    state.completed_challenges
                );
                state
            }
            None => MetricsState::fresh(session_id.clone(), clock.timestamp()),
        };

        let mut store = Self {
            storage,
            clock,
            state,
        };
        store.persist();
        store
    }

    pub fn state(&self) -> &MetricsState {
        &self.state
    }

    pub fn record_attempt(&mut self, success: bool) {
        let next = self.state.with_attempt(success);
        self.commit(next);
    }

    pub fn record_skip(&mut self) {
        let next = self.state.with_skip();
        self.commit(next);
    }

    pub fn append_challenge(
        &mut self,
        challenge_id: QuestionId,
        difficulty: Difficulty,
        attempts: u32,
        time_spent: f64,
        completed_at: DateTime<Utc>,
    ) {
        let record = ChallengeRecord {
            challenge_id,
            difficulty,
            time_spent: time_spent.max(0.0),
            attempts,
            completed_at,
        };
        let next = self.state.with_challenge(record);
        self.commit(next);
    }

    /// Replace the document with a zeroed one for `session_id`.
    pub fn reset(&mut self, session_id: SessionId) {
        let next = MetricsState::fresh(session_id, self.clock.timestamp());
        self.commit(next);
    }

    /// Drop the stored document. The in-memory one stays until the next
    /// `reset` or `load`.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(METRICS_KEY) {
            log_warn!("Failed to clear stored metrics: {err:#}");
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        MetricsSnapshot::new(self.state.clone(), now)
    }

    fn commit(&mut self, next: MetricsState) {
        self.state = next;
        self.persist();
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.state) {
            Ok(serialized) => serialized,
            Err(err) => {
                log_error!("Failed to serialize metrics: {err}");
                return;
            }
        };

        if let Err(err) = self.storage.set(METRICS_KEY, &serialized) {
            log_error!("Failed to persist metrics: {err:#}");
        }
    }
}

fn read_state(storage: &dyn KeyValueStore) -> Option<MetricsState> {
    let raw = match storage.get(METRICS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log_warn!("Stored metrics unavailable, starting fresh: {err:#}");
            return None;
        }
    };

    match serde_json::from_str::<MetricsState>(&raw) {
        Ok(state) if state.is_consistent() => Some(state),
        Ok(_) => {
            log_warn!("Stored metrics violate counter invariants, starting fresh");
            None
        }
        Err(err) => {
            log_warn!("Stored metrics are corrupt, starting fresh: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, storage::MemoryStore};
    use chrono::{Duration, TimeZone};

    struct Fixture {
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<ManualClock>,
        session_id: SessionId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                storage: Arc::new(MemoryStore::new()),
                clock: Arc::new(ManualClock::new(
                    Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap(),
                )),
                session_id: SessionId::from("session-1-1".to_string()),
            }
        }

        fn load(&self) -> MetricsStore {
            MetricsStore::load(self.storage.clone(), self.clock.clone(), &self.session_id)
        }

        fn stored(&self) -> MetricsState {
            let raw = self.storage.get(METRICS_KEY).unwrap().unwrap();
            serde_json::from_str(&raw).unwrap()
        }
    }

    #[test]
    fn fresh_state_is_zeroed_and_persisted() {
        let fixture = Fixture::new();
        let store = fixture.load();

        assert_eq!(store.state().attempts, 0);
        assert_eq!(store.state().session_id, fixture.session_id);
        assert_eq!(store.state().start_time, fixture.clock.now());
        assert_eq!(&fixture.stored(), store.state());
    }

    #[test]
    fn every_mutation_is_written_through() {
        let fixture = Fixture::new();
        let mut store = fixture.load();

        store.record_attempt(false);
        assert_eq!(&fixture.stored(), store.state());

        store.record_skip();
        assert_eq!(&fixture.stored(), store.state());

        fixture.clock.advance(Duration::seconds(3));
        store.append_challenge(QuestionId(2), Difficulty::Hard, 1, 3.0, fixture.clock.timestamp());
        assert_eq!(&fixture.stored(), store.state());

        let state = store.state();
        assert_eq!((state.attempts, state.errors, state.skips), (1, 1, 1));
        assert_eq!(state.challenge_details[0].completed_at, fixture.clock.now());
    }

    #[test]
    fn reload_returns_identical_document() {
        let fixture = Fixture::new();
        let mut store = fixture.load();
        store.record_attempt(true);
        fixture.clock.advance(Duration::milliseconds(1234));
        store.append_challenge(
            QuestionId(4),
            Difficulty::Medium,
            0,
            1.234,
            fixture.clock.timestamp(),
        );
        let before = store.state().clone();

        let reloaded = fixture.load();
        assert_eq!(reloaded.state(), &before);
    }

    #[test]
    fn corrupt_document_falls_back_to_fresh_state() {
        let fixture = Fixture::new();
        fixture.storage.set(METRICS_KEY, "{not json").unwrap();

        let store = fixture.load();
        assert_eq!(store.state().completed_challenges, 0);
        assert_eq!(&fixture.stored(), store.state());
    }

    #[test]
    fn reset_replaces_session_and_counters() {
        let fixture = Fixture::new();
        let mut store = fixture.load();
        store.record_attempt(false);
        store.record_skip();

        fixture.clock.advance(Duration::minutes(5));
        let next = SessionId::from("session-2-2".to_string());
        store.reset(next.clone());

        assert_eq!(store.state(), &MetricsState::fresh(next, fixture.clock.now()));
        assert_eq!(&fixture.stored(), store.state());
    }

    #[test]
    fn snapshot_does_not_touch_storage() {
        let fixture = Fixture::new();
        let store = fixture.load();
        let before = fixture.storage.get(METRICS_KEY).unwrap();

        let snapshot = store.snapshot(fixture.clock.now() + Duration::seconds(60));
        assert_eq!(snapshot.duration, 60.0);
        assert_eq!(fixture.storage.get(METRICS_KEY).unwrap(), before);
    }
}
