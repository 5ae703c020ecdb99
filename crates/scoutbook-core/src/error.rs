//! Error types for scoutbook-core

use thiserror::Error;

/// Result type alias using scoutbook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scoutbook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blob storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected a request
    #[error("Server error: {0}")]
    Api(String),

    /// Event configuration has not been synced yet
    #[error("No event configuration cached; run a sync first")]
    SyncRequired,
}
