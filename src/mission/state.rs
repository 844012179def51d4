use serde::Serialize;

use crate::models::{Mode, QuestionId, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum MissionPhase {
    ModeUnselected,
    Initializing { mode: Mode },
    Active { index: usize },
    Complete,
    Errored { message: String },
}

/// Per-mode data carried through a mission. Only learning missions have a
/// profile to update.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ModeSession {
    Standard,
    Learning { profile: UserProfile },
}

impl ModeSession {
    pub(crate) fn mode(&self) -> Mode {
        match self {
            ModeSession::Standard => Mode::Standard,
            ModeSession::Learning { .. } => Mode::Learning,
        }
    }

    pub(crate) fn profile(&self) -> Option<&UserProfile> {
        match self {
            ModeSession::Standard => None,
            ModeSession::Learning { profile } => Some(profile),
        }
    }
}

/// How the participant left the current challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Solved; `attempts` includes the final successful run.
    Completed { attempts: u32 },
    Skipped,
}

impl Outcome {
    pub(crate) fn completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    pub(crate) fn skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }

    /// Attempt count handed to the skill model.
    pub(crate) fn effective_attempts(&self) -> u32 {
        match self {
            Outcome::Completed { attempts } => *attempts,
            Outcome::Skipped => 0,
        }
    }
}

/// Events emitted back by the challenge renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionEvent {
    Attempt { success: bool },
    Complete,
    Skip,
    CodeChanged { question_id: QuestionId, code: String },
}
