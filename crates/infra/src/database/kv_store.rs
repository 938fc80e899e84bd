//! SQLite-backed [`KeyValueStore`].

use std::sync::Arc;

use appraisal_core::storage::{KeyValueStore, StorageError};
use appraisal_domain::{Result, StorageConfig};
use rusqlite::{params, OptionalExtension};
use tracing::warn;

use super::manager::DbManager;
use crate::errors::{storage_error_from_pool, storage_error_from_sql};

/// Durable store for the local cache. One row per namespaced key.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Arc<DbManager>,
}

impl SqliteStore {
    /// Wrap an existing manager and make sure the schema is present.
    pub fn new(db: Arc<DbManager>) -> Result<Self> {
        db.run_migrations()?;
        Ok(Self { db })
    }

    pub fn open(config: &StorageConfig) -> Result<Self> {
        Self::new(Arc::new(DbManager::from_config(config)?))
    }

    pub fn manager(&self) -> &Arc<DbManager> {
        &self.db
    }

    /// Number of stored keys.
    pub fn len(&self) -> std::result::Result<usize, StorageError> {
        let conn = self.db.get_connection().map_err(storage_error_from_pool)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))
            .map_err(storage_error_from_sql)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub fn is_empty(&self) -> std::result::Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let conn = self.db.get_connection().map_err(storage_error_from_pool)?;
        conn.query_row("SELECT value FROM kv_entries WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        })
        .optional()
        .map_err(storage_error_from_sql)
    }

    fn write(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let conn = self.db.get_connection().map_err(storage_error_from_pool)?;
        conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s','now') AS INTEGER))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(storage_error_from_sql)
        .inspect_err(|err| {
            if matches!(err, StorageError::QuotaExceeded(_)) {
                warn!(key = %key, bytes = value.len(), "sqlite store is full");
            }
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        let conn = self.db.get_connection().map_err(storage_error_from_pool)?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
            .map_err(storage_error_from_sql)?;
        Ok(())
    }
}
