use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Invalid mode: {0:?}")]
    InvalidMode(String),
}

/// Reasons a mission could not be built. The display text is shown to the
/// participant unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissionError {
    #[error("Could not find enough suitable questions")]
    NotEnoughQuestions,
    #[error("{0}")]
    Selection(String),
}
