use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] scoutbook_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Scout name is not set. Run `scoutbook name <NAME>` first.")]
    ScoutNameNotSet,
    #[error("No event configuration cached. Run `scoutbook sync` first.")]
    SyncRequired,
    #[error("A match id is required for {0} entries (pass --match)")]
    MissingMatchId(&'static str),
    #[error("Invalid field value: {0}")]
    InvalidValue(String),
    #[error("No entry stored for this identity")]
    EntryNotFound,
    #[error("Server is not configured. Pass --server or set SCOUTBOOK_SERVER_URL.")]
    ServerNotConfigured,
    #[error("Sync failed; local data is unchanged and will be retried on the next run")]
    SyncFailed,
}
