//! Port interfaces for the durable key/value store
//!
//! The data layer depends only on this trait. Infrastructure provides a
//! SQLite-backed implementation; [`super::InMemoryStore`] covers tests and
//! ephemeral runs.

use appraisal_common::error::{ErrorClassification, ErrorSeverity};
use appraisal_domain::AppraisalError;
use thiserror::Error;

/// Failures raised by a key/value store.
///
/// Always transient from the caller's point of view: cache writes are
/// best-effort and a failed write never aborts the logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("stored value could not be serialized: {0}")]
    Serialization(String),
}

impl ErrorClassification for StorageError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::QuotaExceeded(_) | Self::Backend(_) => ErrorSeverity::Warning,
            Self::Serialization(_) => ErrorSeverity::Error,
        }
    }
}

impl From<StorageError> for AppraisalError {
    fn from(err: StorageError) -> Self {
        AppraisalError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Durable string store addressed by namespaced keys (`namespace:key`).
///
/// Implementations must be safe to share across tasks. Calls are short and
/// synchronous, matching the browser storage they stand in for.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `Ok(None)` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
