//! # Rules Configuration
//!
//! Every tunable rule constant lives here so games can be played with
//! house rules without touching the engine.
//!
//! ```rust
//! use gridiron_core::config::RulesConfig;
//!
//! let rules = RulesConfig::default();
//! let short = RulesConfig::short_quarters();
//! assert!(short.quarter_length < rules.quarter_length);
//! ```

use crate::models::TimeOption;
use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const RULES_PATH_ENV: &str = "GRIDIRON_RULES_PATH";

pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 1500;

/// Seconds burned between snaps for each time option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunoffConfig {
    pub normal: u32,
    pub chew: u32,
    pub hurry: u32,
}

impl Default for RunoffConfig {
    fn default() -> Self {
        Self { normal: 20, chew: 35, hurry: 7 }
    }
}

/// Fixed in-play durations for plays that never consult the time table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedDurations {
    pub spike: u32,
    pub kneel: u32,
    pub pat: u32,
    pub two_point: u32,
}

impl Default for FixedDurations {
    fn default() -> Self {
        Self { spike: 1, kneel: 1, pat: 0, two_point: 0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Seconds per regulation quarter
    pub quarter_length: u32,
    pub timeouts_per_half: u32,
    /// Hours a side has to respond before a playclock penalty
    pub playclock_hours: i64,
    /// Warn the waiting side when fewer than this many hours remain
    pub playclock_warning_hours: i64,
    /// Days until the game is forced to finish
    pub game_deadline_days: i64,
    pub history_cap: usize,
    pub max_playclock_penalties: u32,
    /// Points given to the opponent of a side that misses the playclock
    pub forced_score: u32,

    pub kickoff_spot: i32,
    pub safety_kick_spot: i32,
    pub conversion_spot: i32,
    pub kickoff_touchback_spot: i32,
    pub touchback_spot: i32,
    pub overtime_spot: i32,

    /// Tied periods allowed in a time-forced overtime before a coin decides
    pub time_forced_overtime_periods: u32,
    /// First quarter number in which only two point conversions are legal
    pub two_point_only_quarter: u32,

    pub runoff: RunoffConfig,
    pub durations: FixedDurations,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            quarter_length: 7 * 60,
            timeouts_per_half: 3,
            playclock_hours: 24,
            playclock_warning_hours: 12,
            game_deadline_days: 10,
            history_cap: 5,
            max_playclock_penalties: 3,
            forced_score: 8,
            kickoff_spot: 35,
            safety_kick_spot: 20,
            conversion_spot: 97,
            kickoff_touchback_spot: 25,
            touchback_spot: 20,
            overtime_spot: 75,
            time_forced_overtime_periods: 1,
            two_point_only_quarter: 7,
            runoff: RunoffConfig::default(),
            durations: FixedDurations::default(),
        }
    }
}

impl RulesConfig {
    /// Five minute quarters for exhibition games
    pub fn short_quarters() -> Self {
        Self { quarter_length: 5 * 60, ..Self::default() }
    }

    /// Seconds of runoff for the chosen time option.
    ///
    /// `RunOutClock` burns whatever is left in the quarter.
    pub fn runoff_seconds(&self, option: TimeOption, clock: u32) -> u32 {
        match option {
            TimeOption::Normal => self.runoff.normal,
            TimeOption::Chew => self.runoff.chew,
            TimeOption::Hurry => self.runoff.hurry,
            TimeOption::RunOutClock => clock,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.quarter_length == 0 {
            return Err("quarter_length must be positive".to_string());
        }
        if self.history_cap == 0 {
            return Err("history_cap must be positive".to_string());
        }
        if self.max_playclock_penalties == 0 {
            return Err("max_playclock_penalties must be positive".to_string());
        }
        if self.playclock_warning_hours >= self.playclock_hours {
            return Err("playclock_warning_hours must be below playclock_hours".to_string());
        }
        let spots = [
            ("kickoff_spot", self.kickoff_spot),
            ("safety_kick_spot", self.safety_kick_spot),
            ("conversion_spot", self.conversion_spot),
            ("kickoff_touchback_spot", self.kickoff_touchback_spot),
            ("touchback_spot", self.touchback_spot),
            ("overtime_spot", self.overtime_spot),
        ];
        for (name, spot) in spots {
            if !(1..=99).contains(&spot) {
                return Err(format!("{name} must be between 1 and 99, got {spot}"));
            }
        }
        if self.two_point_only_quarter <= 4 {
            return Err("two_point_only_quarter must be an overtime quarter".to_string());
        }
        Ok(())
    }

    /// Load rules from the file named by `GRIDIRON_RULES_PATH`, or the defaults
    /// when the variable is unset. `.yaml`/`.yml` files are read as YAML, all
    /// others as JSON.
    pub fn from_env() -> Result<Self, String> {
        let Ok(path) = env::var(RULES_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read rules file from {RULES_PATH_ENV}='{path}': {e}"))?;

        let config = if path.ends_with(".yaml") || path.ends_with(".yml") {
            Self::from_yaml(&content).map_err(|e| {
                format!("Failed to parse rules YAML from {RULES_PATH_ENV}='{path}': {e}")
            })?
        } else {
            Self::from_json(&content).map_err(|e| {
                format!("Failed to parse rules JSON from {RULES_PATH_ENV}='{path}': {e}")
            })?
        };

        config
            .validate()
            .map_err(|e| format!("Invalid rules from {RULES_PATH_ENV}='{path}': {e}"))?;

        Ok(config)
    }
}
