//! SQLite-backed settings store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::{SettingsStore, StoreError, StoreResult, StoredOverride};

/// Busy timeout applied to every connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS app_settings (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);";

/// Settings store persisting overrides in the `app_settings` table of a
/// SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    path: Option<PathBuf>,
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`, creating parent directories
    /// and the settings table as needed.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors while creating directories and SQLite errors while
    /// opening the database or creating the schema.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(&path)?;
        let store = Self::initialize(connection, Some(path))?;
        debug!(path = ?store.path, "settings store opened");
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors while creating the schema.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::initialize(Connection::open_in_memory()?, None)
    }

    fn initialize(connection: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        connection.busy_timeout(BUSY_TIMEOUT)?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            path,
            connection: Mutex::new(connection),
        })
    }

    /// Returns the database file path, or `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> StoreResult<T> {
        let guard = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard)?)
    }
}

impl SettingsStore for SqliteStore {
    fn find_all(&self) -> StoreResult<Vec<StoredOverride>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM app_settings ORDER BY key")?;
            let rows = stmt.query_map([], |row| {
                Ok(StoredOverride {
                    key: row.get(0)?,
                    value: row.get(1)?,
                })
            })?;
            let overrides = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(overrides)
        })
    }

    fn find(&self, key: &str) -> StoreResult<Option<StoredOverride>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT key, value FROM app_settings WHERE key = ?1",
                params![key],
                |row| {
                    Ok(StoredOverride {
                        key: row.get(0)?,
                        value: row.get(1)?,
                    })
                },
            )
            .optional()
        })
    }

    fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
        })?;
        debug!(key, "setting override saved");
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            conn.execute("DELETE FROM app_settings WHERE key = ?1", params![key])
        })?;
        debug!(key, removed, "setting override deleted");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_lists_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.find_all().unwrap().is_empty());
        assert_eq!(store.find("missing").unwrap(), None);
        assert!(store.path().is_none());
    }

    #[test]
    fn upsert_replaces_existing_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert("foo", "one").unwrap();
        store.upsert("foo", "two").unwrap();
        store.upsert("bar", "three").unwrap();

        assert_eq!(
            store.find_all().unwrap(),
            vec![
                StoredOverride::new("bar", "three"),
                StoredOverride::new("foo", "two"),
            ]
        );
        assert_eq!(
            store.find("foo").unwrap(),
            Some(StoredOverride::new("foo", "two"))
        );
    }

    #[test]
    fn delete_reports_whether_a_row_existed() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert("foo", "bar").unwrap();
        assert!(store.delete("foo").unwrap());
        assert!(!store.delete("foo").unwrap());
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn rows_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert("log.level", "debug").unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.find_all().unwrap(),
            vec![StoredOverride::new("log.level", "debug")]
        );
    }

    #[test]
    fn unopenable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteStore::open(dir.path()).expect_err("a directory is not a database");
        assert!(matches!(err, StoreError::Sqlite { .. }));
    }
}
