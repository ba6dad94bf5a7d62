use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Game not found: {id}")]
    GameNotFound { id: String },
}

impl SaveError {
    /// Whether retrying the same operation later could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            SaveError::Io(_) | SaveError::GameNotFound { .. } => true,
            SaveError::Serialization(_)
            | SaveError::Deserialization(_)
            | SaveError::Decompression
            | SaveError::Corrupted
            | SaveError::VersionMismatch { .. }
            | SaveError::ChecksumMismatch => false,
        }
    }
}
