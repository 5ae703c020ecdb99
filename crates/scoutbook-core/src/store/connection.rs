//! Database connection management

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::Connection;

use crate::error::Result;

use super::migrations;

/// Wrapper around the structured `SQLite` store holding entries and
/// settings.
///
/// The connection sits behind a mutex so the store can be shared between the
/// editing layer and an in-flight sync run; writes stay atomic at the
/// single-record granularity.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure against the connection while holding the store lock.
    pub(crate) fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }
}

/// Configure `SQLite` for a client-side store
fn configure(conn: &Connection) -> Result<()> {
    // WAL may be unavailable on some filesystems; not fatal
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_open_on_disk_is_reopenable() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scoutbook.db");

        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO settings (key, value) VALUES ('scoutName', 'Ada')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        db.with_conn(|conn| {
            let name: String = conn.query_row(
                "SELECT value FROM settings WHERE key = 'scoutName'",
                [],
                |row| row.get(0),
            )?;
            assert_eq!(name, "Ada");
            Ok(())
        })
        .unwrap();
    }
}
