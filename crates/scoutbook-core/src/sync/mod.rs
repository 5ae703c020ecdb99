//! Synchronization layer: server API client and sync engine

mod api;
mod engine;

pub use api::{HttpScoutApi, ScoutApi};
pub use engine::{KindReport, SyncEngine, SyncOutcome, SyncReport};
