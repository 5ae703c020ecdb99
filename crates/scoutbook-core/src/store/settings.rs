//! Settings and cached-configuration store
//!
//! One key/value table holding everything that is not an entry record: the
//! server-delivered configuration blobs (event roster, per-kind field
//! definitions), the per-kind sync watermarks, and the scout name.

use rusqlite::params;

use crate::error::Result;
use crate::models::{EventInfo, RecordKind};

use super::connection::Database;

/// Settings key caching the event roster payload.
pub const MATCH_LIST_KEY: &str = "matchList";
/// Settings key holding the configured scout name.
pub const SCOUT_NAME_KEY: &str = "scoutName";

/// Store view for settings and cached configuration.
pub struct SettingsStore<'a> {
    db: &'a Database,
}

impl<'a> SettingsStore<'a> {
    /// Create a new store view over the given database
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Read a raw settings value.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.db.with_conn(|conn| {
            let row = conn.query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            );

            match row {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Write a raw settings value (total overwrite).
    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
                params![key, value],
            )?;
            Ok(())
        })
    }

    /// Last successful sync watermark for a record kind; 0 when never
    /// synced.
    pub fn watermark(&self, kind: RecordKind) -> Result<u64> {
        let Some(raw) = self.get_raw(kind.watermark_key())? else {
            return Ok(0);
        };
        Ok(raw.parse().unwrap_or(0))
    }

    /// Persist a record kind's sync watermark.
    pub fn set_watermark(&self, kind: RecordKind, timestamp_ms: u64) -> Result<()> {
        self.set_raw(kind.watermark_key(), &timestamp_ms.to_string())
    }

    /// The configured scout name, if any.
    pub fn scout_name(&self) -> Result<Option<String>> {
        Ok(self
            .get_raw(SCOUT_NAME_KEY)?
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()))
    }

    /// Set the scout name.
    pub fn set_scout_name(&self, name: &str) -> Result<()> {
        self.set_raw(SCOUT_NAME_KEY, name.trim())
    }

    /// The cached event configuration; `None` when never synced or
    /// unreadable.
    pub fn event_info(&self) -> Result<Option<EventInfo>> {
        let Some(raw) = self.get_raw(MATCH_LIST_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(info) => Ok(Some(info)),
            Err(error) => {
                tracing::debug!(%error, "cached event configuration is unreadable");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watermark_defaults_to_zero() {
        let db = Database::open_in_memory().unwrap();
        let settings = SettingsStore::new(&db);

        assert_eq!(settings.watermark(RecordKind::Match).unwrap(), 0);
        assert_eq!(settings.watermark(RecordKind::Pit).unwrap(), 0);
        assert_eq!(settings.watermark(RecordKind::Driver).unwrap(), 0);
    }

    #[test]
    fn test_watermarks_are_independent_per_kind() {
        let db = Database::open_in_memory().unwrap();
        let settings = SettingsStore::new(&db);

        settings.set_watermark(RecordKind::Match, 1234).unwrap();
        assert_eq!(settings.watermark(RecordKind::Match).unwrap(), 1234);
        assert_eq!(settings.watermark(RecordKind::Pit).unwrap(), 0);
    }

    #[test]
    fn test_scout_name_trims_and_rejects_empty() {
        let db = Database::open_in_memory().unwrap();
        let settings = SettingsStore::new(&db);

        assert!(settings.scout_name().unwrap().is_none());

        settings.set_scout_name("  Ada  ").unwrap();
        assert_eq!(settings.scout_name().unwrap().as_deref(), Some("Ada"));

        settings.set_scout_name("   ").unwrap();
        assert!(settings.scout_name().unwrap().is_none());
    }

    #[test]
    fn test_event_info_absent_or_corrupt_is_none() {
        let db = Database::open_in_memory().unwrap();
        let settings = SettingsStore::new(&db);

        assert!(settings.event_info().unwrap().is_none());

        settings.set_raw(MATCH_LIST_KEY, "not json").unwrap();
        assert!(settings.event_info().unwrap().is_none());

        settings
            .set_raw(MATCH_LIST_KEY, r#"{"year":2024,"event":"2024idbo"}"#)
            .unwrap();
        let info = settings.event_info().unwrap().unwrap();
        assert_eq!(info.year, 2024);
        assert_eq!(info.event, "2024idbo");
    }
}
