//! SQLite-backed blob store.
//!
//! Portable fallback backend for hosts without an OS keychain. A single
//! `blobs` key-value table in one database file, restricted to owner-only
//! permissions on Unix. Unlike a real keychain the file carries no OS-level
//! at-rest encryption; deployments that have a keychain should prefer it.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, VaultError};
use crate::storage::traits::SecureBlobStore;

/// SQLite-backed blob store.
pub struct SqliteBlobStore {
    #[allow(dead_code)]
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteBlobStore {
    /// Open (or create) a blob store database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Store` if the parent directory cannot be
    /// created or the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VaultError::Store(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        set_file_permissions(path)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory blob store (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Store("SQLite connection poisoned".to_string()))
    }
}

impl SecureBlobStore for SqliteBlobStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO blobs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM blobs WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }
}

fn set_file_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_delete_round_trip() {
        let store = SqliteBlobStore::open_in_memory().unwrap();

        store.set("userPin", "1234").unwrap();
        assert_eq!(store.get("userPin").unwrap().as_deref(), Some("1234"));

        store.delete("userPin").unwrap();
        assert_eq!(store.get("userPin").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_existing() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        store.delete("missing").unwrap();
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.db");

        {
            let store = SqliteBlobStore::open(&path).unwrap();
            store.set("noteKeys", "[]").unwrap();
        }

        let store = SqliteBlobStore::open(&path).unwrap();
        assert_eq!(store.get("noteKeys").unwrap().as_deref(), Some("[]"));
    }

    #[cfg(unix)]
    #[test]
    fn test_database_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let _store = SqliteBlobStore::open(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
