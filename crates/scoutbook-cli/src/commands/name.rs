//! Scout name management

use std::path::Path;

use scoutbook_core::store::SettingsStore;

use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_name(name: Option<&str>, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let settings = SettingsStore::new(&db);

    if let Some(name) = name {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CliError::ScoutNameNotSet);
        }
        settings.set_scout_name(trimmed)?;
        println!("{trimmed}");
        return Ok(());
    }

    match settings.scout_name()? {
        Some(current) => println!("{current}"),
        None => println!("No scout name set. Run `scoutbook name <NAME>`."),
    }
    Ok(())
}
