use crate::error::TableError;
use crate::models::{PlayResult, PlayType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source of in-play durations
pub trait TimeProvider {
    /// Seconds a play took, matched on the closest tabulated yardage
    fn play_seconds(&self, play: PlayType, result: PlayResult, yards: Option<i32>) -> Option<u32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub yards: i32,
    pub seconds: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeTable {
    entries: BTreeMap<(PlayType, PlayResult), Vec<TimeEntry>>,
}

impl TimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row. Rows without yardage are stored at 0 yards.
    pub fn insert(
        &mut self,
        play: PlayType,
        result: PlayResult,
        yards: Option<i32>,
        seconds: u32,
    ) -> Result<(), TableError> {
        let yards = yards.unwrap_or(0);
        let entries = self.entries.entry((play, result)).or_default();
        match entries.binary_search_by_key(&yards, |e| e.yards) {
            Ok(_) => Err(TableError::DuplicateTime { play, result: result.to_string(), yards }),
            Err(index) => {
                entries.insert(index, TimeEntry { yards, seconds });
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TimeProvider for TimeTable {
    fn play_seconds(&self, play: PlayType, result: PlayResult, yards: Option<i32>) -> Option<u32> {
        let target = yards.unwrap_or(0);
        // Entries are sorted by yards, so ties resolve to the shorter gain.
        self.entries
            .get(&(play, result))?
            .iter()
            .min_by_key(|e| (e.yards - target).abs())
            .map(|e| e.seconds)
    }
}
