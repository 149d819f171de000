//! Scheduling core error types.
//!
//! Callers match on these to tell a first run (absent state, handled by
//! restoring defaults) apart from corrupt data or a failing disk.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the scheduling core and its persistence adapters.
#[derive(Debug, Error)]
pub enum SrsError {
    /// The word is not in the tracked-word set.
    #[error("unknown word: {0}")]
    UnknownWord(String),

    /// Goal-frequency ranks start at 1.
    #[error("invalid goal rank {rank} for '{word}': ranks start at 1")]
    InvalidRank { word: String, rank: u32 },

    /// Persisted state exists but could not be decoded.
    #[error("malformed state in {origin}: {reason}")]
    MalformedState { origin: String, reason: String },

    /// A snapshot could not be encoded for saving.
    #[error("failed to serialize state for {origin}: {source}")]
    Serialization {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The persistence adapter failed to read or write.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SrsError {
    /// Returns `true` if the error means stored data is corrupt.
    pub fn is_malformed(&self) -> bool {
        matches!(self, SrsError::MalformedState { .. })
    }
}

/// Convenience alias for core results.
pub type Result<T> = std::result::Result<T, SrsError>;
