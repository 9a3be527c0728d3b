//! SQLite-backed preference repository.
//!
//! One `prefs` table of string key/value pairs. Writes upsert, so the
//! stored value is always the latest one written (last-write-wins).

use rollcall_core::{PreferenceStore, PrefsError};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub struct SqlitePrefs {
    conn: Connection,
}

impl SqlitePrefs {
    /// Open (or create) the preference database at `path`.
    pub fn open(path: &Path) -> Result<Self, PrefsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }
        let conn = Connection::open(path).map_err(storage_err)?;
        Self::init(conn)
    }

    /// In-memory store; nothing survives the connection.
    pub fn open_in_memory() -> Result<Self, PrefsError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, PrefsError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prefs (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(storage_err)?;
        Ok(Self { conn })
    }
}

impl PreferenceStore for SqlitePrefs {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        self.conn
            .query_row("SELECT value FROM prefs WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.conn
            .execute(
                "INSERT INTO prefs (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .map_err(storage_err)?;
        tracing::debug!(key, value, "preference written");
        Ok(())
    }
}

fn storage_err(e: impl std::fmt::Display) -> PrefsError {
    PrefsError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{AttendanceToggle, FACE_RECOGNITION_KEY};

    #[test]
    fn missing_key_reads_as_none() {
        let store = SqlitePrefs::open_in_memory().unwrap();
        assert_eq!(store.get(FACE_RECOGNITION_KEY).unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = SqlitePrefs::open_in_memory().unwrap();
        store.set(FACE_RECOGNITION_KEY, "true").unwrap();
        assert_eq!(
            store.get(FACE_RECOGNITION_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn last_write_wins() {
        let store = SqlitePrefs::open_in_memory().unwrap();
        store.set(FACE_RECOGNITION_KEY, "true").unwrap();
        store.set(FACE_RECOGNITION_KEY, "false").unwrap();
        assert_eq!(
            store.get(FACE_RECOGNITION_KEY).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn preference_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("prefs.db");

        {
            let store = SqlitePrefs::open(&db_path).unwrap();
            let mut toggle = AttendanceToggle::hydrate(store).unwrap();
            toggle.apply(true).unwrap();
        }

        // Simulated reload: fresh connection, same file.
        let store = SqlitePrefs::open(&db_path).unwrap();
        let toggle = AttendanceToggle::hydrate(store).unwrap();
        assert!(toggle.enabled());
    }
}
