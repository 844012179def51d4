use std::{fmt, sync::Arc};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    log_debug, log_warn,
    storage::{KeyValueStore, SESSION_ID_KEY},
};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "bitvoyager::identity";

/// Anonymous participant identifier, stable across restarts until reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn generate(clock: &dyn Clock) -> Self {
        let timestamp = clock.now().timestamp_millis();
        let random: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self(format!("session-{timestamp}-{random}"))
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads and writes the session identifier. Storage is treated as a cache:
/// when it is unavailable a fresh id is still handed out for this run.
#[derive(Clone)]
pub struct IdentityStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl IdentityStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn get_or_create_session_id(&self) -> SessionId {
        match self.storage.get(SESSION_ID_KEY) {
            Ok(Some(existing)) if !existing.trim().is_empty() => {
                return SessionId(existing);
            }
            Ok(_) => {}
            Err(err) => {
                log_warn!("Session id could not be read, issuing a new one: {err:#}");
            }
        }

        self.regenerate()
    }

    /// Issue a new id and make it the stored one.
    pub fn regenerate(&self) -> SessionId {
        let session_id = SessionId::generate(self.clock.as_ref());
        if let Err(err) = self.storage.set(SESSION_ID_KEY, session_id.as_str()) {
            log_warn!("Session id {session_id} will not persist: {err:#}");
        } else {
            log_debug!("Stored new session id {session_id}");
        }
        session_id
    }

    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(SESSION_ID_KEY) {
            log_warn!("Failed to clear session id: {err:#}");
        }
    }
}
