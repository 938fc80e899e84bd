//! Write-through local cache
//!
//! Values live in an in-memory mirror and are written through to the
//! durable store. A failed durable write is reported to the caller but the
//! mirror keeps the new value, so reads within the same process still see
//! it. Entries are only ever replaced or explicitly removed.

use std::sync::Arc;

use appraisal_domain::namespaced_key;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::ports::{KeyValueStore, StorageError};

/// Namespaced JSON cache layered over a [`KeyValueStore`].
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
    mirror: DashMap<String, Value>,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, mirror: DashMap::new() }
    }

    /// Read and deserialize `namespace:key`.
    ///
    /// Returns `None` when the entry is absent, unreadable, or does not
    /// match `T`. Never fails.
    pub fn read<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        let value = self.read_value(namespace, key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(namespace, key, error = %err, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Read the raw JSON value stored at `namespace:key`.
    pub fn read_value(&self, namespace: &str, key: &str) -> Option<Value> {
        let full_key = namespaced_key(namespace, key);
        if let Some(entry) = self.mirror.get(&full_key) {
            return Some(entry.value().clone());
        }

        let raw = match self.store.read(&full_key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %full_key, error = %err, "durable cache read failed");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                self.mirror.insert(full_key, value.clone());
                Some(value)
            }
            Err(err) => {
                warn!(key = %full_key, error = %err, "durable cache entry is not valid JSON");
                None
            }
        }
    }

    /// Serialize and store `value` at `namespace:key`.
    ///
    /// A serialization failure leaves the cache untouched. A durable-store
    /// failure is returned after the in-memory mirror has been updated.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let value = serde_json::to_value(value)?;
        self.write_value(namespace, key, value)
    }

    /// Store a raw JSON value at `namespace:key`.
    pub fn write_value(&self, namespace: &str, key: &str, value: Value) -> Result<(), StorageError> {
        let full_key = namespaced_key(namespace, key);
        let encoded = serde_json::to_string(&value)?;
        self.mirror.insert(full_key.clone(), value);

        self.store.write(&full_key, &encoded).inspect_err(|err| {
            warn!(key = %full_key, error = %err, "durable cache write failed; value kept in memory");
        })?;

        debug!(key = %full_key, bytes = encoded.len(), "cache entry written");
        Ok(())
    }

    /// Remove `namespace:key` from memory and the durable store.
    pub fn remove(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let full_key = namespaced_key(namespace, key);
        self.mirror.remove(&full_key);
        self.store.remove(&full_key)
    }

    /// Whether an entry exists for `namespace:key`.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.read_value(namespace, key).is_some()
    }
}

impl std::fmt::Debug for LocalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCache").field("mirrored_entries", &self.mirror.len()).finish()
    }
}
