//! Sync queue records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::HttpMethod;

/// A mutation waiting to be replayed against the backend.
///
/// Immutable once created except for `retry_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTask {
    pub id: u64,
    pub endpoint: String,
    pub method: HttpMethod,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub retry_count: u32,
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Tasks replayed successfully and removed.
    pub succeeded: Vec<u64>,
    /// Tasks that reached the retry bound and were discarded.
    pub dropped: Vec<u64>,
    /// Tasks that failed and remain queued with an incremented retry count.
    pub retained: Vec<u64>,
    /// Tasks not attempted because an earlier task on the same endpoint
    /// failed during this pass.
    pub deferred: Vec<u64>,
    /// True when another pass was already in flight and this call did nothing.
    pub skipped: bool,
}

impl DrainReport {
    pub fn skipped() -> Self {
        Self { skipped: true, ..Self::default() }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.dropped.len() + self.retained.len()
    }
}
