//! Read-only renderings of a game for reporters.

use crate::models::{GameStatus, PlaySummary};
use std::fmt::Display;

pub const PLAY_LOG_HEADER: &str = "Home score|Away score|Quarter|Clock|Ball location|Possession|Down|Yards to go|\
Defensive number|Offensive number|Defensive submitter|Offensive submitter|\
Play|Result|Actual result|Yards|Play time|Runoff time";

/// Separates drives in the play log
pub const DRIVE_SEPARATOR: &str = "-";

fn optional<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn play_row(play: &PlaySummary) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        play.home_score,
        play.away_score,
        play.quarter,
        play.clock,
        play.location,
        play.possession,
        play.down,
        play.yards_to_go,
        optional(&play.defense_number),
        optional(&play.offense_number),
        optional(&play.defense_submitter),
        optional(&play.offense_submitter),
        play.play,
        optional(&play.result),
        play.actual_result,
        optional(&play.yards),
        play.play_time,
        play.runoff_time,
    )
}

/// Pipe-delimited play log, one row per play, drives split by a separator line
pub fn render_play_log(status: &GameStatus) -> String {
    let mut out = String::new();
    out.push_str(PLAY_LOG_HEADER);
    out.push('\n');

    let mut first = true;
    for drive in status.plays.iter().filter(|drive| !drive.is_empty()) {
        if !first {
            out.push_str(DRIVE_SEPARATOR);
            out.push('\n');
        }
        first = false;
        for play in drive {
            out.push_str(&play_row(play));
            out.push('\n');
        }
    }
    out
}
