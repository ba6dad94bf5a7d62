use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two competing teams in a game.
///
/// `Side` is `Copy`, so "negate to a new value" and "reverse in place" are
/// always distinct, explicit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// The opposing side
    pub fn negate(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Flip this side in place
    pub fn reverse(&mut self) {
        *self = self.negate();
    }

    pub fn is_home(self) -> bool {
        matches!(self, Side::Home)
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }

    pub fn from_is_home(is_home: bool) -> Self {
        if is_home {
            Side::Home
        } else {
            Side::Away
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value held once per side.
///
/// Used for per-team state and statistics so lookups never branch on a bool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub home: T,
    pub away: T,
}

impl<T> PerSide<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}
