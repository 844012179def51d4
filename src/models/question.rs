use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::mode::Difficulty;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One challenge as handed over by the question bank. Content beyond what the
/// tracker reads is kept opaque in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub difficulty: Difficulty,
    /// Starter code shown before the participant edits anything.
    pub code: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Question {
    pub fn new(
        id: QuestionId,
        title: impl Into<String>,
        difficulty: Difficulty,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            difficulty,
            code: code.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Every question that loaded successfully, keyed by id.
pub type QuestionPool = BTreeMap<QuestionId, Question>;
