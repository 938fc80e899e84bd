//! Bounded local activity log
//!
//! Security-relevant events (logins, lockouts, expiry) and sync outcomes are
//! appended to a capped list persisted in the local cache. The oldest
//! entries are discarded first.

use std::sync::Arc;

use appraisal_common::time::Clock;
use appraisal_domain::constants::{ACTIVITY_LOG_KEY, ACTIVITY_LOG_NAMESPACE};
use appraisal_domain::{ActivityEntry, ActivityKind};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::storage::LocalCache;

pub struct ActivityLog {
    cache: Arc<LocalCache>,
    clock: Arc<dyn Clock>,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl ActivityLog {
    pub fn new(cache: Arc<LocalCache>, clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self { cache, clock, capacity, write_lock: Mutex::new(()) }
    }

    /// Append an event. Persistence failures are logged and swallowed.
    pub fn record(&self, kind: ActivityKind, principal_id: Option<&str>, detail: Option<String>) {
        let mut entry = ActivityEntry::new(kind, self.clock.now());
        if let Some(principal_id) = principal_id {
            entry = entry.with_principal(principal_id);
        }
        if let Some(detail) = detail {
            entry = entry.with_detail(detail);
        }

        let _guard = self.write_lock.lock();
        let mut entries = self.entries();
        entries.push(entry);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        match self.cache.write(ACTIVITY_LOG_NAMESPACE, ACTIVITY_LOG_KEY, &entries) {
            Ok(()) => debug!(kind = %kind, "activity recorded"),
            Err(err) => warn!(kind = %kind, error = %err, "failed to persist activity log"),
        }
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.cache.read(ACTIVITY_LOG_NAMESPACE, ACTIVITY_LOG_KEY).unwrap_or_default()
    }

    /// Retained entries of one kind, oldest first.
    pub fn entries_of(&self, kind: ActivityKind) -> Vec<ActivityEntry> {
        self.entries().into_iter().filter(|entry| entry.kind == kind).collect()
    }
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog").field("capacity", &self.capacity).finish()
    }
}
