use super::play::{PlayResult, PlayType};
use super::side::Side;
use serde::{Deserialize, Serialize};

/// Record of one resolved play.
///
/// The leading fields are a snapshot of the status taken before the play ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySummary {
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: u32,
    pub clock: u32,
    pub location: i32,
    pub possession: Side,
    pub down: u32,
    pub yards_to_go: i32,

    pub play: PlayType,
    pub defense_number: Option<u32>,
    pub offense_number: Option<u32>,
    pub defense_submitter: Option<String>,
    pub offense_submitter: Option<String>,
    /// Result the outcome table returned, if it was consulted
    pub result: Option<PlayResult>,
    /// Result after reclassification (a gain past the goal line is a touchdown)
    pub actual_result: PlayResult,
    pub yards: Option<i32>,
    pub play_time: u32,
    pub runoff_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveSummary {
    pub possession: Side,
    pub yards: i32,
    pub seconds: u32,
    pub result: PlayResult,
}
