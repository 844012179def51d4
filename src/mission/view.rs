use serde::Serialize;

use crate::models::{Difficulty, Mode, Question, UserProfile};

/// Summary handed to the renderer alongside the current question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    /// 1-based position in the mission.
    pub current: usize,
    pub total: usize,
    pub difficulty: Difficulty,
    pub completed_difficulties: Vec<Difficulty>,
    pub mode: Mode,
    pub user_profile: Option<UserProfile>,
    pub attempts: u32,
    pub is_retry: bool,
    pub previously_failed: bool,
}

/// What the surrounding UI should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionView {
    ModeSelection,
    Loading { mode: Mode },
    Failed { message: String },
    Complete { export_available: bool },
    Challenge { question: Question, progress: ProgressInfo },
    /// Active mission without a question at the current index. Should never
    /// happen; the UI asks the participant to restart.
    MissingQuestion,
}
