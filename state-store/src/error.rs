//! Storage error types.
//!
//! Used by state store implementations and callers of storage APIs.

use storebot_core::BotError;
use thiserror::Error;

/// Errors that can occur when loading or saving conversation state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt state record for {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for BotError {
    fn from(e: StorageError) -> Self {
        BotError::Storage(e.to_string())
    }
}
