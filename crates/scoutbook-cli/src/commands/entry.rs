//! Entry editing commands: set, clear, show, attach, scouts

use std::path::Path;

use scoutbook_core::models::{
    now_ms, DriverEntryIdData, EntryRecord, EntryValue, ImageEntry, ImageRef, MatchEntryIdData,
    PitEntryIdData,
};
use scoutbook_core::store::{BlobStore, Database, EntryStore, SettingsStore};
use uuid::Uuid;

use crate::cli::{EntryKindArg, EntryTarget};
use crate::commands::common::{
    load_or_create, mime_for_path, open_database, parse_value, require_event, require_scout_name,
    TargetRecord,
};
use crate::error::CliError;

pub fn run_set(
    target: &EntryTarget,
    field: &str,
    value: &str,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let key = match target.kind {
        EntryKindArg::Match => set_field::<MatchEntryIdData>(&db, target, field, value)?,
        EntryKindArg::Pit => set_field::<PitEntryIdData>(&db, target, field, value)?,
        EntryKindArg::Driver => set_field::<DriverEntryIdData>(&db, target, field, value)?,
    };
    println!("{key}");
    Ok(())
}

pub fn run_clear(target: &EntryTarget, field: &str, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let removed = match target.kind {
        EntryKindArg::Match => clear_field::<MatchEntryIdData>(&db, target, field)?,
        EntryKindArg::Pit => clear_field::<PitEntryIdData>(&db, target, field)?,
        EntryKindArg::Driver => clear_field::<DriverEntryIdData>(&db, target, field)?,
    };
    if removed {
        println!("Cleared {field}");
    } else {
        println!("Field {field} was not set");
    }
    Ok(())
}

pub fn run_show(target: &EntryTarget, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let rendered = match target.kind {
        EntryKindArg::Match => show_record::<MatchEntryIdData>(&db, target)?,
        EntryKindArg::Pit => show_record::<PitEntryIdData>(&db, target)?,
        EntryKindArg::Driver => show_record::<DriverEntryIdData>(&db, target)?,
    };
    println!("{rendered}");
    Ok(())
}

pub fn run_attach(
    target: &EntryTarget,
    field: &str,
    file: &Path,
    db_path: &Path,
    image_db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let blobs = BlobStore::new(image_db_path);
    let image_id = match target.kind {
        EntryKindArg::Match => attach_image::<MatchEntryIdData>(&db, &blobs, target, field, file)?,
        EntryKindArg::Pit => attach_image::<PitEntryIdData>(&db, &blobs, target, field, file)?,
        EntryKindArg::Driver => {
            attach_image::<DriverEntryIdData>(&db, &blobs, target, field, file)?
        }
    };
    println!("{image_id}");
    Ok(())
}

pub fn run_scouts(target: &EntryTarget, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let scouts = match target.kind {
        EntryKindArg::Match => scouts_of::<MatchEntryIdData>(&db, target)?,
        EntryKindArg::Pit => scouts_of::<PitEntryIdData>(&db, target)?,
        EntryKindArg::Driver => scouts_of::<DriverEntryIdData>(&db, target)?,
    };
    if scouts.is_empty() {
        println!("No scouting data");
    } else {
        for scout in scouts {
            println!("{scout}");
        }
    }
    Ok(())
}

fn set_field<R: TargetRecord>(
    db: &Database,
    target: &EntryTarget,
    field: &str,
    raw: &str,
) -> Result<String, CliError> {
    let settings = SettingsStore::new(db);
    let scout = require_scout_name(&settings)?;
    let info = require_event(&settings)?;
    let id = R::target_id(target)?;

    let store = EntryStore::new(db);
    let mut record: R = load_or_create(&store, &id, &info)?;
    let value = parse_value(raw, &scout, now_ms())?;
    record.data_mut().set_value(field, value);
    store.put(&record)?;
    Ok(record.storage_key())
}

fn clear_field<R: TargetRecord>(
    db: &Database,
    target: &EntryTarget,
    field: &str,
) -> Result<bool, CliError> {
    let settings = SettingsStore::new(db);
    let info = require_event(&settings)?;
    let id = R::target_id(target)?;

    let store = EntryStore::new(db);
    let Some(mut record) = store.get::<R>(&id)? else {
        return Err(CliError::EntryNotFound);
    };
    if !record.data().matches_event(info.year, &info.event) {
        return Err(CliError::EntryNotFound);
    }

    let removed = record.data_mut().clear_value(field);
    if removed {
        store.put(&record)?;
    }
    Ok(removed)
}

fn show_record<R: TargetRecord>(db: &Database, target: &EntryTarget) -> Result<String, CliError> {
    let id = R::target_id(target)?;
    let store = EntryStore::new(db);
    let record = store.get::<R>(&id)?.ok_or(CliError::EntryNotFound)?;
    Ok(serde_json::to_string_pretty(&record)?)
}

fn attach_image<R: TargetRecord>(
    db: &Database,
    blobs: &BlobStore,
    target: &EntryTarget,
    field: &str,
    file: &Path,
) -> Result<Uuid, CliError> {
    let settings = SettingsStore::new(db);
    let scout = require_scout_name(&settings)?;
    let info = require_event(&settings)?;
    let id = R::target_id(target)?;

    let bytes = std::fs::read(file)?;
    let name = file
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    let image_id = blobs.save(&bytes, &name)?;

    let store = EntryStore::new(db);
    let mut record: R = load_or_create(&store, &id, &info)?;
    let mut images = match record.data().entries.get(field) {
        Some(EntryValue::Image(entry)) => entry.images.clone(),
        _ => Vec::new(),
    };
    images.push(ImageRef {
        image_id,
        image_mime: mime_for_path(file).to_string(),
        local: true,
    });
    record.data_mut().set_value(
        field,
        EntryValue::Image(ImageEntry {
            images,
            timestamp_ms: now_ms(),
            scout,
        }),
    );
    store.put(&record)?;
    Ok(image_id)
}

fn scouts_of<R: TargetRecord>(
    db: &Database,
    target: &EntryTarget,
) -> Result<Vec<String>, CliError> {
    let settings = SettingsStore::new(db);
    let info = require_event(&settings)?;
    let id = R::target_id(target)?;
    let store = EntryStore::new(db);
    Ok(store.scouts_for::<R>(&id, info.year, &info.event)?)
}
