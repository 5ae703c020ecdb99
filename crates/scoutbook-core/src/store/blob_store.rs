//! Image blob store
//!
//! Binary attachment payloads are too large for the structured entry store,
//! so they live in a second database keyed by generated identifier. The
//! connection opens lazily on first use and is memoized behind the lock, so
//! concurrent first calls never produce two handles.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Local persistence for image attachment payloads.
pub struct BlobStore {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl BlobStore {
    /// Create a handle for the store at `path`. The underlying database is
    /// not opened until the first `save` or `get`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
        }
    }

    /// Create a handle backed by an in-memory database (useful for testing).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Store a binary payload under a freshly generated identifier.
    pub fn save(&self, data: &[u8], name: &str) -> Result<Uuid> {
        let image_id = Uuid::new_v4();
        let guard = self.open_conn()?;
        let conn = guard.as_ref().ok_or_else(|| {
            Error::Storage("image store connection unavailable".to_string())
        })?;
        conn.execute(
            "INSERT INTO images (image_id, name, data) VALUES (?, ?, ?)",
            params![image_id.to_string(), name, data],
        )?;
        Ok(image_id)
    }

    /// Retrieve a previously stored payload; `None` if never stored or
    /// evicted.
    pub fn get(&self, image_id: &Uuid) -> Result<Option<Vec<u8>>> {
        let guard = self.open_conn()?;
        let conn = guard.as_ref().ok_or_else(|| {
            Error::Storage("image store connection unavailable".to_string())
        })?;
        let data = conn
            .query_row(
                "SELECT data FROM images WHERE image_id = ?",
                params![image_id.to_string()],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(data)
    }

    /// Open the store if it hasn't been opened yet. Callers race on the
    /// mutex, so the open runs at most once; open failure is fatal to the
    /// triggering operation.
    fn open_conn(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(open_store(&self.path)?);
        }
        Ok(guard)
    }
}

fn open_store(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|error| {
        Error::Storage(format!(
            "failed to open image store at {}: {error}",
            path.display()
        ))
    })?;

    // Durability is best-effort: without it the payloads survive normal use
    // but may be evicted under storage pressure.
    if conn.pragma_update(None, "journal_mode", "WAL").is_err()
        || conn.pragma_update(None, "synchronous", "NORMAL").is_err()
    {
        tracing::warn!(
            path = %path.display(),
            "image store persistence is not guaranteed; attachments may be lost under storage pressure"
        );
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS images (
            image_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            data BLOB NOT NULL
        );",
    )
    .map_err(|error| Error::Storage(format!("failed to initialize image store: {error}")))?;

    Ok(conn)
}
