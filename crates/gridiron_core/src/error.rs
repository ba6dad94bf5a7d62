use crate::models::{Action, PlayType, Side};
use thiserror::Error;

/// How the surrounding system should treat a refused operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from a coach; report it and wait for another submission
    InputValidation,
    /// The game is in a state that refuses this operation
    Refused,
    /// The tables could not answer; flag the game errored
    DataIntegrity,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Number {0} is out of range, it must be between 1 and 1500")]
    NumberOutOfRange(u32),

    #[error("Could not find a number in the message")]
    MissingNumber,

    #[error("More than one play matched: {0:?}")]
    AmbiguousPlay(Vec<PlayType>),

    #[error("No valid play found for {0}")]
    UnknownPlay(Action),

    #[error("Play {play} is not valid while waiting on {expected}")]
    WrongPlay { play: PlayType, expected: Action },

    #[error("Not waiting on {got}, waiting on {expected}")]
    NotExpected { expected: Action, got: Action },

    #[error("Waiting on a submission from {expected}, not {got}")]
    WrongSide { expected: Side, got: Side },

    #[error("The defense has not submitted a number yet")]
    NoDefenseNumber,

    #[error("Onside kicks are not allowed after a safety")]
    OnsideNotAllowed,

    #[error("Only two point conversions are allowed from the third overtime on")]
    PatNotAllowed,

    #[error("No timeouts remaining for {0}")]
    NoTimeouts(Side),

    #[error("Nothing to revert to at history index {0}")]
    NoHistory(usize),

    #[error("Game is flagged errored")]
    Errored,

    #[error("Game is over")]
    GameOver,

    #[error("No outcome for {play} at position {position} with difference {difference}")]
    MissingOutcome { play: PlayType, position: i32, difference: u32 },

    #[error("No play time for {play} with result {result}")]
    MissingPlayTime { play: PlayType, result: String },

    #[error("Outcome {result} is not valid for {play}")]
    InvalidOutcome { play: PlayType, result: String },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NumberOutOfRange(_)
            | GameError::MissingNumber
            | GameError::AmbiguousPlay(_)
            | GameError::UnknownPlay(_)
            | GameError::WrongPlay { .. }
            | GameError::WrongSide { .. }
            | GameError::OnsideNotAllowed
            | GameError::PatNotAllowed
            | GameError::NoTimeouts(_) => ErrorKind::InputValidation,
            GameError::NotExpected { .. }
            | GameError::NoDefenseNumber
            | GameError::NoHistory(_)
            | GameError::Errored
            | GameError::GameOver => ErrorKind::Refused,
            GameError::MissingOutcome { .. }
            | GameError::MissingPlayTime { .. }
            | GameError::InvalidOutcome { .. } => ErrorKind::DataIntegrity,
        }
    }
}

/// Structural problems in an externally supplied table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Could not parse range: {0}")]
    MalformedRange(String),

    #[error("Range {low}-{high} is inverted")]
    InvertedRange { low: u32, high: u32 },

    #[error("Ranges must start at {expected}, first range starts at {found}")]
    StartGap { expected: u32, found: u32 },

    #[error("Gap between {previous_high} and {next_low}")]
    Gap { previous_high: u32, next_low: u32 },

    #[error("Range {next_low} overlaps previous range ending at {previous_high}")]
    Overlap { previous_high: u32, next_low: u32 },

    #[error("Ranges must end at {expected}, last range ends at {found}")]
    EndGap { expected: u32, found: u32 },

    #[error("Table has no ranges")]
    Empty,

    #[error("Duplicate time entry for {play}/{result} at {yards} yards")]
    DuplicateTime { play: PlayType, result: String, yards: i32 },

    #[error("Play {0} needs offense and defense schemes only if it is a run or pass")]
    SchemeMismatch(PlayType),

    #[error("{table}: {source}")]
    InTable { table: String, source: Box<TableError> },
}

impl TableError {
    pub fn in_table(self, table: impl Into<String>) -> Self {
        TableError::InTable { table: table.into(), source: Box::new(self) }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(GameError::NumberOutOfRange(0).kind(), ErrorKind::InputValidation);
        assert_eq!(GameError::Errored.kind(), ErrorKind::Refused);
        assert_eq!(
            GameError::MissingOutcome { play: PlayType::Run, position: 50, difference: 3 }.kind(),
            ErrorKind::DataIntegrity
        );
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::WrongSide { expected: Side::Home, got: Side::Away };
        assert_eq!(err.to_string(), "Waiting on a submission from home, not away");
        let err = TableError::Gap { previous_high: 10, next_low: 12 };
        assert_eq!(err.to_string(), "Gap between 10 and 12");
    }
}
