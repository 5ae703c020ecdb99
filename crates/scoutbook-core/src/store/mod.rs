//! Local persistence layer for scoutbook

mod blob_store;
mod connection;
mod entry_store;
mod migrations;
mod settings;

pub use blob_store::BlobStore;
pub use connection::Database;
pub use entry_store::EntryStore;
pub use settings::{SettingsStore, MATCH_LIST_KEY, SCOUT_NAME_KEY};
