//! In-memory key/value store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::ports::{KeyValueStore, StorageError};

/// Process-local store with an optional byte quota.
///
/// The quota counts key and value bytes, mirroring the way browser storage
/// reports a full store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once `quota_bytes` would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self { entries: RwLock::new(HashMap::new()), quota_bytes: Some(quota_bytes) }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Raw stored value, bypassing any cache layered on top.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();

        if let Some(quota) = self.quota_bytes {
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let projected = Self::used_bytes(&entries) - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "writing {key} needs {projected} bytes, quota is {quota}"
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
