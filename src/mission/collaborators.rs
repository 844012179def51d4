//! Contracts for the parts of the learning tool that live outside the
//! tracker: question content, adaptive selection and the learning profile.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{
    log_warn,
    models::{Mode, Question, QuestionId, QuestionPool, UserProfile},
    storage::{KeyValueStore, PROFILE_KEY},
};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "bitvoyager::mission";

pub trait QuestionBank {
    /// Load a single question. Failures only drop that id from the pool.
    fn load_question(&self, id: QuestionId) -> Result<Question>;
}

pub trait QuestionSelector {
    /// Pick the ordered challenge sequence for a mission. An empty result
    /// means the pool could not satisfy the mode.
    fn select_questions(
        &self,
        mode: Mode,
        profile: Option<&UserProfile>,
        pool: &QuestionPool,
    ) -> Result<Vec<Question>>;
}

pub trait SkillModel {
    /// Fold one challenge outcome into the profile, returning the new profile.
    fn update_skill_levels(
        &self,
        profile: &UserProfile,
        question: &Question,
        completed: bool,
        attempts: u32,
        skipped: bool,
    ) -> UserProfile;
}

pub trait ProfileStore {
    fn load_profile(&self) -> UserProfile;
    fn save_profile(&self, profile: &UserProfile) -> Result<()>;
}

/// Everything the mission flow consumes from outside.
pub struct Collaborators {
    pub bank: Box<dyn QuestionBank>,
    pub selector: Box<dyn QuestionSelector>,
    pub skills: Box<dyn SkillModel>,
    pub profiles: Box<dyn ProfileStore>,
}

/// Keeps the learning profile in the shared key/value storage, under the key
/// the browser build used.
#[derive(Clone)]
pub struct StorageProfileStore {
    storage: Arc<dyn KeyValueStore>,
}

impl StorageProfileStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

impl ProfileStore for StorageProfileStore {
    fn load_profile(&self) -> UserProfile {
        match self.storage.get(PROFILE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log_warn!("Learning profile is corrupt, starting over: {err}");
                UserProfile::default()
            }),
            Ok(None) => UserProfile::default(),
            Err(err) => {
                log_warn!("Learning profile unavailable: {err:#}");
                UserProfile::default()
            }
        }
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let serialized =
            serde_json::to_string(profile).context("failed to serialize learning profile")?;
        self.storage.set(PROFILE_KEY, &serialized)
    }
}
