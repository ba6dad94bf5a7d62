//! Deterministic coin flips.
//!
//! Every flip is drawn from a fresh ChaCha stream seeded by the game's coin
//! seed plus the number of flips already made, so replaying a saved game
//! reproduces the same tosses.

use crate::models::GameStatus;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn flip(seed: u64, salt: u32) -> bool {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(u64::from(salt)));
    rng.gen_bool(0.5)
}

/// Flip the next coin for this game and count it
pub(crate) fn next_flip(status: &mut GameStatus, seed: u64) -> bool {
    let heads = flip(seed, status.coin_tosses);
    status.coin_tosses += 1;
    heads
}
