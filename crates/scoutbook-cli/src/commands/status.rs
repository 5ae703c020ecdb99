//! Local store status

use std::path::Path;

use scoutbook_core::models::{
    DriverEntryIdData, EntryRecord, MatchEntryIdData, PitEntryIdData, RecordKind,
};
use scoutbook_core::store::{Database, EntryStore, SettingsStore};
use serde::Serialize;

use crate::commands::common::open_database;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub scout_name: Option<String>,
    pub year: Option<u32>,
    pub event: Option<String>,
    pub kinds: Vec<KindStatus>,
}

#[derive(Debug, Serialize)]
pub struct KindStatus {
    pub kind: &'static str,
    pub watermark_ms: u64,
    pub stored: usize,
    pub changed: usize,
}

pub fn run_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let report = collect_status(&db)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.scout_name {
        Some(name) => println!("Scout: {name}"),
        None => println!("Scout: (not set)"),
    }
    match (&report.year, &report.event) {
        (Some(year), Some(event)) => println!("Event: {event} ({year})"),
        _ => println!("Event: (not synced)"),
    }
    for kind in &report.kinds {
        println!(
            "{:<8} {} stored, {} awaiting sync (watermark {})",
            kind.kind, kind.stored, kind.changed, kind.watermark_ms
        );
    }
    Ok(())
}

pub fn collect_status(db: &Database) -> Result<StatusReport, CliError> {
    let settings = SettingsStore::new(db);
    let scout_name = settings.scout_name()?;
    let Some(info) = settings.event_info()? else {
        return Ok(StatusReport {
            scout_name,
            year: None,
            event: None,
            kinds: Vec::new(),
        });
    };

    let kinds = vec![
        kind_status::<MatchEntryIdData>(db, info.year, &info.event)?,
        kind_status::<PitEntryIdData>(db, info.year, &info.event)?,
        kind_status::<DriverEntryIdData>(db, info.year, &info.event)?,
    ];

    Ok(StatusReport {
        scout_name,
        year: Some(info.year),
        event: Some(info.event),
        kinds,
    })
}

fn kind_status<R: EntryRecord>(db: &Database, year: u32, event: &str) -> Result<KindStatus, CliError> {
    let kind: RecordKind = R::KIND;
    let settings = SettingsStore::new(db);
    let watermark_ms = settings.watermark(kind)?;

    let records: Vec<R> = EntryStore::new(db).list_all(year, event)?;
    let changed = records
        .iter()
        .filter(|record| record.data().timestamp_ms > watermark_ms)
        .count();

    Ok(KindStatus {
        kind: kind.label(),
        watermark_ms,
        stored: records.len(),
        changed,
    })
}
