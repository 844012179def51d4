use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Standard,
    Learning,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Learning => "learning",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Mode::Standard),
            "learning" => Ok(Mode::Learning),
            _ => Err(TrackerError::InvalidMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty label for each position of a standard mission.
pub const DIFFICULTY_ORDER: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

pub fn difficulty_for_position(index: usize) -> Option<Difficulty> {
    DIFFICULTY_ORDER.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes_case_insensitively() {
        assert_eq!("standard".parse::<Mode>(), Ok(Mode::Standard));
        assert_eq!("Learning".parse::<Mode>(), Ok(Mode::Learning));
        assert_eq!(
            "expert".parse::<Mode>(),
            Err(TrackerError::InvalidMode("expert".into()))
        );
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn standard_positions_map_to_fixed_difficulties() {
        assert_eq!(difficulty_for_position(0), Some(Difficulty::Easy));
        assert_eq!(difficulty_for_position(1), Some(Difficulty::Medium));
        assert_eq!(difficulty_for_position(2), Some(Difficulty::Hard));
        assert_eq!(difficulty_for_position(3), None);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
    }
}
