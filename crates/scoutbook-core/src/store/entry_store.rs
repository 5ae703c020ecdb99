//! Entry record persistence
//!
//! Records are stored as JSON under deterministic keys derived from their
//! identity tuples, partitioned implicitly by record-kind prefix. A row that
//! fails to parse is treated as not-found: entry forms must render for a
//! fresh identity anyway, so absence is always a normal case here.

use rusqlite::params;

use crate::error::Result;
use crate::models::EntryRecord;

use super::connection::Database;

/// Durable client-side store for scouting entry records.
pub struct EntryStore<'a> {
    db: &'a Database,
}

impl<'a> EntryStore<'a> {
    /// Create a new store view over the given database
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Load the record for an identity; `None` when missing or unreadable.
    pub fn get<R: EntryRecord>(&self, id: &R::Id) -> Result<Option<R>> {
        let key = R::key_for(id);
        self.db.with_conn(|conn| {
            let row = conn.query_row(
                "SELECT value FROM entries WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            );

            match row {
                Ok(value) => Ok(parse_record(&key, &value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Serialize and write a record at its derived key (total overwrite).
    pub fn put<R: EntryRecord>(&self, record: &R) -> Result<()> {
        let key = record.storage_key();
        let value = serde_json::to_string(record)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO entries (key, value) VALUES (?, ?)",
                params![key, value],
            )?;
            Ok(())
        })
    }

    /// Enumerate every stored record of `R`'s kind belonging to the given
    /// event.
    ///
    /// Records from other events stay stored but are excluded; unreadable
    /// rows are skipped.
    pub fn list_all<R: EntryRecord>(&self, year: u32, event: &str) -> Result<Vec<R>> {
        let prefix = R::KIND.storage_prefix();
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key, value FROM entries WHERE key LIKE ? || '%'")?;
            let rows = stmt.query_map(params![prefix], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (key, value) = row?;
                if let Some(record) = parse_record::<R>(&key, &value) {
                    if record.data().matches_event(year, event) {
                        records.push(record);
                    }
                }
            }
            Ok(records)
        })
    }

    /// Distinct scout names recorded for an identity, empty when the record
    /// is absent or belongs to a different event.
    pub fn scouts_for<R: EntryRecord>(
        &self,
        id: &R::Id,
        year: u32,
        event: &str,
    ) -> Result<Vec<String>> {
        let Some(record) = self.get::<R>(id)? else {
            return Ok(Vec::new());
        };
        if !record.data().matches_event(year, event) {
            return Ok(Vec::new());
        }
        Ok(record.data().scouts())
    }
}

fn parse_record<R: EntryRecord>(key: &str, value: &str) -> Option<R> {
    match serde_json::from_str(value) {
        Ok(record) => Some(record),
        Err(error) => {
            tracing::debug!(key, %error, "skipping unreadable entry record");
            None
        }
    }
}
