//! Play, result and action taxonomies.
//!
//! Every dispatch over these enums is an exhaustive `match`; adding a variant
//! must fail to compile until each site handles it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a table or keyword name for lookup ("Field Goal" == "field_goal" == "fieldgoal").
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayType {
    Run,
    Pass,
    Punt,
    FieldGoal,
    Kneel,
    Spike,
    Pat,
    TwoPoint,
    KickoffNormal,
    KickoffSquib,
    KickoffOnside,
}

impl PlayType {
    pub const ALL: [PlayType; 11] = [
        PlayType::Run,
        PlayType::Pass,
        PlayType::Punt,
        PlayType::FieldGoal,
        PlayType::Kneel,
        PlayType::Spike,
        PlayType::Pat,
        PlayType::TwoPoint,
        PlayType::KickoffNormal,
        PlayType::KickoffSquib,
        PlayType::KickoffOnside,
    ];

    /// Plays whose outcome depends on both playbooks
    pub fn is_movement(self) -> bool {
        matches!(self, PlayType::Run | PlayType::Pass)
    }

    /// Plays that always succeed without consulting the outcome table
    pub fn is_time_play(self) -> bool {
        matches!(self, PlayType::Kneel | PlayType::Spike)
    }

    /// The action this play is legal for
    pub fn action(self) -> Action {
        match self {
            PlayType::Run
            | PlayType::Pass
            | PlayType::Punt
            | PlayType::FieldGoal
            | PlayType::Kneel
            | PlayType::Spike => Action::Play,
            PlayType::Pat | PlayType::TwoPoint => Action::Conversion,
            PlayType::KickoffNormal | PlayType::KickoffSquib | PlayType::KickoffOnside => {
                Action::Kickoff
            }
        }
    }

    /// Words a coach may use to call this play
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            PlayType::Run => &["run"],
            PlayType::Pass => &["pass"],
            PlayType::Punt => &["punt"],
            PlayType::FieldGoal => &["field goal", "fieldgoal", "fg"],
            PlayType::Kneel => &["kneel"],
            PlayType::Spike => &["spike"],
            PlayType::Pat => &["pat", "extra point"],
            PlayType::TwoPoint => &["two point", "two-point", "2pt", "2 point"],
            PlayType::KickoffNormal => &["normal"],
            PlayType::KickoffSquib => &["squib"],
            PlayType::KickoffOnside => &["onside"],
        }
    }

    /// Parse the name used in table files
    pub fn from_table_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "run" => Some(PlayType::Run),
            "pass" => Some(PlayType::Pass),
            "punt" => Some(PlayType::Punt),
            "fieldgoal" | "fg" => Some(PlayType::FieldGoal),
            "kneel" => Some(PlayType::Kneel),
            "spike" => Some(PlayType::Spike),
            "pat" => Some(PlayType::Pat),
            "twopoint" => Some(PlayType::TwoPoint),
            "kickoffnormal" | "normal" => Some(PlayType::KickoffNormal),
            "kickoffsquib" | "squib" => Some(PlayType::KickoffSquib),
            "kickoffonside" | "onside" => Some(PlayType::KickoffOnside),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayType::Run => "run",
            PlayType::Pass => "pass",
            PlayType::Punt => "punt",
            PlayType::FieldGoal => "fieldGoal",
            PlayType::Kneel => "kneel",
            PlayType::Spike => "spike",
            PlayType::Pat => "pat",
            PlayType::TwoPoint => "twoPoint",
            PlayType::KickoffNormal => "kickoffNormal",
            PlayType::KickoffSquib => "kickoffSquib",
            PlayType::KickoffOnside => "kickoffOnside",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayResult {
    Gain,
    Incomplete,
    Touchdown,
    Turnover,
    TurnoverTouchdown,
    FieldGoal,
    Miss,
    Pat,
    TwoPoint,
    Kick,
    Touchback,
    Safety,
    Spike,
    Kneel,
    EndHalf,
}

impl PlayResult {
    /// Results that close the current drive
    pub fn ends_drive(self) -> bool {
        match self {
            PlayResult::Touchdown
            | PlayResult::Turnover
            | PlayResult::TurnoverTouchdown
            | PlayResult::FieldGoal
            | PlayResult::Miss
            | PlayResult::Kick
            | PlayResult::Touchback
            | PlayResult::Safety
            | PlayResult::EndHalf => true,
            PlayResult::Gain
            | PlayResult::Incomplete
            | PlayResult::Pat
            | PlayResult::TwoPoint
            | PlayResult::Spike
            | PlayResult::Kneel => false,
        }
    }

    /// Results after which the game clock keeps running into the next snap
    pub fn keeps_clock_running(self) -> bool {
        matches!(self, PlayResult::Gain | PlayResult::Kneel)
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "gain" => Some(PlayResult::Gain),
            "incomplete" => Some(PlayResult::Incomplete),
            "touchdown" => Some(PlayResult::Touchdown),
            "turnover" => Some(PlayResult::Turnover),
            "turnovertouchdown" => Some(PlayResult::TurnoverTouchdown),
            "fieldgoal" => Some(PlayResult::FieldGoal),
            "miss" => Some(PlayResult::Miss),
            "pat" => Some(PlayResult::Pat),
            "twopoint" => Some(PlayResult::TwoPoint),
            "kick" | "punt" => Some(PlayResult::Kick),
            "touchback" => Some(PlayResult::Touchback),
            "safety" => Some(PlayResult::Safety),
            "spike" => Some(PlayResult::Spike),
            "kneel" => Some(PlayResult::Kneel),
            "endhalf" => Some(PlayResult::EndHalf),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayResult::Gain => "gain",
            PlayResult::Incomplete => "incomplete",
            PlayResult::Touchdown => "touchdown",
            PlayResult::Turnover => "turnover",
            PlayResult::TurnoverTouchdown => "turnoverTouchdown",
            PlayResult::FieldGoal => "fieldGoal",
            PlayResult::Miss => "miss",
            PlayResult::Pat => "pat",
            PlayResult::TwoPoint => "twoPoint",
            PlayResult::Kick => "kick",
            PlayResult::Touchback => "touchback",
            PlayResult::Safety => "safety",
            PlayResult::Spike => "spike",
            PlayResult::Kneel => "kneel",
            PlayResult::EndHalf => "endHalf",
        }
    }
}

impl fmt::Display for PlayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the game is waiting for next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Coin,
    Defer,
    Play,
    Conversion,
    Kickoff,
    OvertimeStart,
    End,
}

impl Action {
    /// Actions resolved by two blind numbers
    pub fn takes_numbers(self) -> bool {
        matches!(self, Action::Play | Action::Conversion | Action::Kickoff)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Coin => "coin",
            Action::Defer => "defer",
            Action::Play => "play",
            Action::Conversion => "conversion",
            Action::Kickoff => "kickoff",
            Action::OvertimeStart => "overtime",
            Action::End => "end",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarterType {
    Normal,
    OvertimeSudden,
    OvertimeTime,
    End,
}

impl QuarterType {
    pub fn is_overtime(self) -> bool {
        matches!(self, QuarterType::OvertimeSudden | QuarterType::OvertimeTime)
    }
}

/// Offense's choice of how much clock to burn before the snap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeOption {
    #[default]
    Normal,
    Chew,
    Hurry,
    RunOutClock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeoutRequest {
    #[default]
    None,
    Requested,
    Used,
}
