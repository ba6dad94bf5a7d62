//! Game persistence: MessagePack + LZ4 with a SHA-256 trailer, written
//! atomically to one file per game.

pub mod error;
pub mod format;
pub mod store;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, GameRecord};
pub use store::{FileGameStore, GameStore};

pub const SAVE_VERSION: u32 = 1;
