use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    identity::SessionId,
    models::{Difficulty, QuestionId},
};

/// One successfully completed challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRecord {
    pub challenge_id: QuestionId,
    pub difficulty: Difficulty,
    /// Seconds between the interval start and completion.
    pub time_spent: f64,
    pub attempts: u32,
    #[serde(with = "iso8601")]
    pub completed_at: DateTime<Utc>,
}

/// The persisted metrics document for one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsState {
    pub session_id: SessionId,
    #[serde(with = "iso8601")]
    pub start_time: DateTime<Utc>,
    pub attempts: u64,
    pub errors: u64,
    pub skips: u64,
    pub completed_challenges: u64,
    pub challenge_details: Vec<ChallengeRecord>,
}

impl MetricsState {
    pub fn fresh(session_id: SessionId, start_time: DateTime<Utc>) -> Self {
        Self {
            session_id,
            start_time,
            attempts: 0,
            errors: 0,
            skips: 0,
            completed_challenges: 0,
            challenge_details: Vec::new(),
        }
    }

    pub fn with_attempt(&self, success: bool) -> Self {
        Self {
            attempts: self.attempts + 1,
            errors: self.errors + u64::from(!success),
            ..self.clone()
        }
    }

    pub fn with_skip(&self) -> Self {
        Self {
            skips: self.skips + 1,
            ..self.clone()
        }
    }

    pub fn with_challenge(&self, record: ChallengeRecord) -> Self {
        let mut challenge_details = self.challenge_details.clone();
        challenge_details.push(record);
        Self {
            completed_challenges: self.completed_challenges + 1,
            challenge_details,
            ..self.clone()
        }
    }

    /// Whether the document obeys the counter invariants. Stored documents
    /// that fail this are discarded like corrupt ones.
    pub fn is_consistent(&self) -> bool {
        self.errors <= self.attempts
            && self.completed_challenges == self.challenge_details.len() as u64
            && self.challenge_details.iter().all(|r| r.time_spent >= 0.0)
    }
}

/// Read-only projection handed out on query or export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(flatten)]
    pub metrics: MetricsState,
    #[serde(with = "iso8601")]
    pub export_time: DateTime<Utc>,
    /// Seconds between `startTime` and `exportTime`.
    pub duration: f64,
}

impl MetricsSnapshot {
    pub fn new(metrics: MetricsState, export_time: DateTime<Utc>) -> Self {
        let duration = (export_time - metrics.start_time).num_milliseconds() as f64 / 1000.0;
        Self {
            metrics,
            export_time,
            duration,
        }
    }
}

/// `2026-10-15T09:00:00.000Z`, the shape `Date.prototype.toISOString` emits.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| D::Error::custom(format!("invalid timestamp '{raw}': {err}")))
    }
}
