//! # gridiron_core - Turn-Based American Football Referee
//!
//! Deterministic rules core for play-by-mail football. Each play is two
//! blind numbers, one from each side; their difference picks an outcome
//! from an externally supplied table and the engine applies it to the game.
//!
//! ## Features
//! - Full regulation state machine: downs, scoring, conversions, kickoffs,
//!   halftime and end of game
//! - Game clock with between-play runoff, timeouts and time options
//! - Two-possession overtime with optional time-forced coin resolution
//! - Playclock penalties escalating to forfeiture
//! - Bounded status history for reverts
//! - Versioned, checksummed save format

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod models;
pub mod report;
pub mod save;
pub mod state;
pub mod table;

pub use config::RulesConfig;
pub use engine::{GameEvent, PlayEngine, PlayReport, Submission};
pub use error::{ErrorKind, GameError, Result, TableError};
pub use game::{Game, PlayclockCheck};
pub use models::{Action, GameStatus, PlayResult, PlayType, Side, TimeOption};
pub use save::{FileGameStore, GameStore, SaveError};
pub use state::GameRegistry;
pub use table::{OutcomeProvider, OutcomeTable, TableBundle, TimeProvider, TimeTable};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
