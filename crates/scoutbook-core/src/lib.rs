//! scoutbook-core - Core library for scoutbook
//!
//! This crate contains the entry model, the local entry and image stores,
//! and the sync engine used by all scoutbook interfaces. It is offline-first:
//! every edit lands in local storage immediately, and a sync run reconciles
//! the local record set with the central server when a connection exists.

pub mod error;
pub mod models;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use models::{EntryData, EntryValue};
