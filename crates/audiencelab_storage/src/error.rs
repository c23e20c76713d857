//! Error types for the storage backends

use thiserror::Error;

/// Errors that can occur when reading or writing a key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The entries could not be encoded as JSON
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding the in-memory map was poisoned
    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),
}
