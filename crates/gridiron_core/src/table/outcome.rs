use super::range::{BucketRange, RangeTable, DIFFERENCE_DOMAIN, POSITION_DOMAIN};
use crate::error::TableError;
use crate::models::{DefenseScheme, OffenseScheme, PlayResult, PlayType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the table says happened on a play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub result: PlayResult,
    pub yards: Option<i32>,
}

impl Outcome {
    pub fn new(result: PlayResult, yards: Option<i32>) -> Self {
        Self { result, yards }
    }
}

/// Everything an outcome lookup is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeKey {
    pub play: PlayType,
    /// Only set for run/pass
    pub offense: Option<OffenseScheme>,
    pub defense: Option<DefenseScheme>,
    /// Field position from the defense's perspective (`100 - location`)
    pub position: i32,
    pub difference: u32,
}

/// Source of play outcomes, total over its declared domain
pub trait OutcomeProvider {
    fn lookup(&self, key: &OutcomeKey) -> Option<Outcome>;
}

pub type DifferenceTable = RangeTable<Outcome>;
pub type PositionTable = RangeTable<DifferenceTable>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTable {
    movement: BTreeMap<(PlayType, OffenseScheme, DefenseScheme), PositionTable>,
    plays: BTreeMap<PlayType, PositionTable>,
}

impl OutcomeTable {
    pub fn builder() -> OutcomeTableBuilder {
        OutcomeTableBuilder::default()
    }

    /// Table keys a complete game could ask for but this table cannot answer
    pub fn missing_tables(
        &self,
        offenses: &[OffenseScheme],
        defenses: &[DefenseScheme],
    ) -> Vec<String> {
        let mut missing = Vec::new();
        for play in PlayType::ALL {
            if play.is_time_play() {
                continue;
            }
            if play.is_movement() {
                for offense in offenses {
                    for defense in defenses {
                        if !self.movement.contains_key(&(play, *offense, *defense)) {
                            missing.push(format!("{play}/{offense}/{defense}"));
                        }
                    }
                }
            } else if !self.plays.contains_key(&play) {
                missing.push(play.to_string());
            }
        }
        missing
    }

    pub fn table_count(&self) -> usize {
        self.movement.len() + self.plays.len()
    }
}

impl OutcomeProvider for OutcomeTable {
    fn lookup(&self, key: &OutcomeKey) -> Option<Outcome> {
        let positions = if key.play.is_movement() {
            self.movement.get(&(key.play, key.offense?, key.defense?))?
        } else {
            self.plays.get(&key.play)?
        };
        let position = u32::try_from(key.position).ok()?;
        positions.lookup(position)?.lookup(key.difference).copied()
    }
}

type TableKey = (PlayType, Option<OffenseScheme>, Option<DefenseScheme>);

/// Collects loose rows and builds validated tables
#[derive(Debug, Default)]
pub struct OutcomeTableBuilder {
    rows: BTreeMap<TableKey, BTreeMap<BucketRange, Vec<(BucketRange, Outcome)>>>,
}

impl OutcomeTableBuilder {
    pub fn insert(
        &mut self,
        play: PlayType,
        offense: Option<OffenseScheme>,
        defense: Option<DefenseScheme>,
        position: BucketRange,
        difference: BucketRange,
        outcome: Outcome,
    ) -> Result<&mut Self, TableError> {
        let has_schemes = offense.is_some() && defense.is_some();
        let no_schemes = offense.is_none() && defense.is_none();
        if (play.is_movement() && !has_schemes) || (!play.is_movement() && !no_schemes) {
            return Err(TableError::SchemeMismatch(play));
        }

        self.rows
            .entry((play, offense, defense))
            .or_default()
            .entry(position)
            .or_default()
            .push((difference, outcome));
        Ok(self)
    }

    pub fn build(self) -> Result<OutcomeTable, TableError> {
        let mut table = OutcomeTable::default();
        for ((play, offense, defense), positions) in self.rows {
            let name = match (offense, defense) {
                (Some(o), Some(d)) => format!("{play}/{o}/{d}"),
                _ => play.to_string(),
            };

            let mut position_entries = Vec::with_capacity(positions.len());
            for (position, differences) in positions {
                let differences = RangeTable::new(DIFFERENCE_DOMAIN, differences)
                    .map_err(|e| e.in_table(format!("{name} position {position}")))?;
                position_entries.push((position, differences));
            }
            let positions =
                RangeTable::new(POSITION_DOMAIN, position_entries).map_err(|e| e.in_table(&name))?;

            match (offense, defense) {
                (Some(o), Some(d)) => {
                    table.movement.insert((play, o, d), positions);
                }
                _ => {
                    table.plays.insert(play, positions);
                }
            }
        }
        Ok(table)
    }
}
