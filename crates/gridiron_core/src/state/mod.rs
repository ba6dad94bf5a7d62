//! Active Game Registry
//!
//! Holds every game currently in play. Each game sits behind its own
//! `Mutex`, so two operations on the same game never interleave while
//! different games advance independently.

use crate::game::Game;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use uuid::Uuid;

type Slot = Arc<Mutex<Game>>;

#[derive(Debug, Default)]
pub struct GameRegistry {
    games: RwLock<HashMap<Uuid, Slot>>,
}

fn lock(slot: &Slot) -> MutexGuard<'_, Game> {
    // A panic mid-transition only ever poisons a copy, the committed game is intact
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game, replacing any game with the same id
    pub fn insert(&self, game: Game) -> Uuid {
        let id = game.id;
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.insert(id, Arc::new(Mutex::new(game)));
        tracing::info!(id = %id, "game registered");
        id
    }

    fn slot(&self, id: Uuid) -> Option<Slot> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.get(&id).cloned()
    }

    /// Run `f` with exclusive access to one game
    pub fn with_game<R>(&self, id: Uuid, f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let slot = self.slot(id)?;
        let mut game = lock(&slot);
        Some(f(&mut game))
    }

    /// Take a game out of the registry, typically after it ends
    pub fn remove(&self, id: Uuid) -> Option<Game> {
        let slot = {
            let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
            games.remove(&id)?
        };
        tracing::info!(id = %id, "game removed");
        let game = lock(&slot).clone();
        Some(game)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.games.read().unwrap_or_else(PoisonError::into_inner).contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> =
            self.games.read().unwrap_or_else(PoisonError::into_inner).keys().copied().collect();
        ids.sort();
        ids
    }

    fn select(&self, mut keep: impl FnMut(&Game) -> bool) -> Vec<Uuid> {
        let slots: Vec<(Uuid, Slot)> = {
            let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
            games.iter().map(|(id, slot)| (*id, Arc::clone(slot))).collect()
        };
        let mut ids: Vec<Uuid> =
            slots.into_iter().filter(|(_, slot)| keep(&lock(slot))).map(|(id, _)| id).collect();
        ids.sort();
        ids
    }

    /// Live games whose waiting side has run out of playclock
    pub fn games_past_playclock(&self, now: DateTime<Utc>) -> Vec<Uuid> {
        self.select(|game| !game.errored && !game.is_ended() && now >= game.playclock)
    }

    pub fn errored(&self) -> Vec<Uuid> {
        self.select(|game| game.errored)
    }

    /// Games changed since they were last saved
    pub fn dirty(&self) -> Vec<Uuid> {
        self.select(|game| game.dirty)
    }
}
