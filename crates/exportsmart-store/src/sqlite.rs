use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use exportsmart_models::storage_schema::{StorageRow, LOCAL_STORAGE_DDL};
use rusqlite::Connection;

use crate::error::StoreError;
use crate::storage::LocalStorage;

/// Local storage persisted in a SQLite file.
///
/// Access is synchronized via `Mutex` since `rusqlite::Connection` is not `Sync`.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the storage file. Creates the schema if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(LOCAL_STORAGE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(LOCAL_STORAGE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("SQLite mutex poisoned: {e}")))
    }

    /// Get the full row for a key, including its last write time.
    pub fn get_row(&self, key: &str) -> Result<Option<StorageRow>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare_cached("SELECT key, value, updated_at FROM local_storage WHERE key = ?1")?;

        let result = stmt.query_row(rusqlite::params![key], |row| {
            Ok(StorageRow {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        });

        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }
}

impl LocalStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_row(key)?.map(|row| row.value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.lock()?.execute(
            "INSERT OR REPLACE INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.execute(
            "DELETE FROM local_storage WHERE key = ?1",
            rusqlite::params![key],
        )?;
        Ok(())
    }
}
