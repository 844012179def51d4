//! The learning-mode participant profile.
//!
//! The profile belongs to the selection collaborator; the tracker only reads
//! the fields below and must hand every other field back untouched.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::question::QuestionId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub completed_questions: Vec<QuestionId>,
    #[serde(default)]
    pub skipped_questions: Vec<QuestionId>,
    /// Keyed by the question id's decimal form, as the browser build stored it.
    #[serde(default)]
    pub failed_attempts: BTreeMap<String, u32>,
    #[serde(default)]
    pub consecutive_days: u32,
    #[serde(default, with = "session_date")]
    pub last_session_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn has_skipped(&self, id: QuestionId) -> bool {
        self.skipped_questions.contains(&id)
    }

    pub fn has_failed(&self, id: QuestionId) -> bool {
        self.failed_attempts.get(&id.to_string()).copied().unwrap_or(0) > 0
    }
}

/// Dates are written the way the browser build wrote them (`Wed Oct 14 2026`)
/// and read back in that form or as `YYYY-MM-DD`.
mod session_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const DISPLAY_FORMAT: &str = "%a %b %d %Y";
    const ISO_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DISPLAY_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| {
            let value = value.trim();
            NaiveDate::parse_from_str(value, DISPLAY_FORMAT)
                .or_else(|_| NaiveDate::parse_from_str(value, ISO_FORMAT))
                .ok()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_browser_profile_and_keeps_unknown_fields() {
        let raw = json!({
            "completedQuestions": [1, 4],
            "skippedQuestions": [7],
            "failedAttempts": { "7": 2 },
            "consecutiveDays": 3,
            "lastSessionDate": "Wed Oct 14 2026",
            "skillLevels": { "loops": 0.4 }
        });

        let profile: UserProfile = serde_json::from_value(raw).unwrap();
        assert_eq!(profile.completed_questions, vec![QuestionId(1), QuestionId(4)]);
        assert!(profile.has_skipped(QuestionId(7)));
        assert!(profile.has_failed(QuestionId(7)));
        assert!(!profile.has_failed(QuestionId(1)));
        assert_eq!(
            profile.last_session_date,
            NaiveDate::from_ymd_opt(2026, 10, 14)
        );

        let written = serde_json::to_value(&profile).unwrap();
        assert_eq!(written["skillLevels"], json!({ "loops": 0.4 }));
        assert_eq!(written["lastSessionDate"], json!("Wed Oct 14 2026"));
    }

    #[test]
    fn accepts_iso_dates_and_missing_fields() {
        let profile: UserProfile =
            serde_json::from_value(json!({ "lastSessionDate": "2026-10-01" })).unwrap();
        assert_eq!(profile.last_session_date, NaiveDate::from_ymd_opt(2026, 10, 1));
        assert_eq!(profile.consecutive_days, 0);
        assert!(profile.completed_questions.is_empty());
    }
}
