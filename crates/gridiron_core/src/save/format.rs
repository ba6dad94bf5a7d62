use super::error::SaveError;
use super::SAVE_VERSION;
use crate::game::Game;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};

const CHECKSUM_LEN: usize = 32;

/// A saved game, versioned for migration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub game: Game,
}

impl GameRecord {
    pub fn new(game: Game, saved_at: DateTime<Utc>) -> Self {
        Self { version: SAVE_VERSION, saved_at, game }
    }
}

/// MessagePack with field names, LZ4 with the size prepended, SHA-256 appended
pub fn serialize_and_compress(record: &GameRecord) -> Result<Vec<u8>, SaveError> {
    let msgpack = to_vec_named(record).map_err(SaveError::Serialization)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<GameRecord, SaveError> {
    // Size header plus checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SaveError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated = hasher.finalize();
    if &calculated[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let record: GameRecord = from_slice(&msgpack).map_err(SaveError::Deserialization)?;

    if record.version > SAVE_VERSION {
        return Err(SaveError::VersionMismatch { found: record.version, expected: SAVE_VERSION });
    }
    Ok(record)
}
