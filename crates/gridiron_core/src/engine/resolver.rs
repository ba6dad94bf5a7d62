//! Call resolution: turn two blind numbers into a table outcome.

use crate::config::MAX_NUMBER;
use crate::error::{GameError, Result};
use crate::models::{DefenseScheme, OffenseScheme, PlayType};
use crate::table::{Outcome, OutcomeKey, OutcomeProvider};

/// Distance between two calls on a (roughly) circular 1..=1500 dial.
///
/// Always in `0..=750` for inputs in range, and symmetric in its arguments.
pub fn difference(offense: u32, defense: u32) -> u32 {
    let max = i64::from(MAX_NUMBER);
    let off = i64::from(offense);
    let def = i64::from(defense);

    let direct = (off - def).abs();
    let wrap_offense = ((max - off).abs() + def).abs();
    let wrap_defense = (off + (max - def).abs()).abs();

    let closest = direct.min(wrap_offense).min(wrap_defense);
    u32::try_from(closest).unwrap_or(u32::MAX)
}

/// Schemes only matter for run and pass
pub fn outcome_key(
    play: PlayType,
    offense: OffenseScheme,
    defense: DefenseScheme,
    location: i32,
    difference: u32,
) -> OutcomeKey {
    let movement = play.is_movement();
    OutcomeKey {
        play,
        offense: movement.then_some(offense),
        defense: movement.then_some(defense),
        position: 100 - location,
        difference,
    }
}

/// Look the key up, treating a miss as a data-integrity failure
pub fn resolve(provider: &dyn OutcomeProvider, key: &OutcomeKey) -> Result<Outcome> {
    provider.lookup(key).ok_or(GameError::MissingOutcome {
        play: key.play,
        position: key.position,
        difference: key.difference,
    })
}
