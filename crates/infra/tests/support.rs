//! Shared helpers for `appraisal-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use appraisal_common::time::{Clock, SystemClock};
use appraisal_core::gateway::{RequestGateway, RetryPolicy, Transport};
use appraisal_core::persistence::PersistenceFacade;
use appraisal_core::session::ActivityLog;
use appraisal_core::storage::{KeyValueStore, LocalCache};
use appraisal_core::sync::{Connectivity, ConnectivityMonitor, SyncQueue};
use appraisal_infra::database::{DbManager, SqliteStore};
use appraisal_infra::http::HttpTransport;
use tempfile::TempDir;

/// Temporary SQLite file that lives as long as the value.
pub struct TestDatabase {
    pub path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = temp_dir.path().join("appraisal.db");
        Self { path, _temp_dir: temp_dir }
    }

    /// Open a fresh store over the same file, as a new process would.
    pub fn open_store(&self) -> Arc<SqliteStore> {
        let manager = DbManager::new(&self.path, 2, None).expect("db manager should be created");
        Arc::new(SqliteStore::new(Arc::new(manager)).expect("store should be created"))
    }
}

/// Facade wired over SQLite and a real HTTP transport.
pub fn data_layer(db: &TestDatabase, base_url: &str) -> Arc<PersistenceFacade> {
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::builder(base_url).build().expect("transport"));
    let policy = RetryPolicy {
        timeout: Duration::from_secs(2),
        max_retries: 1,
        base_delay: Duration::from_millis(10),
    };
    let gateway = Arc::new(RequestGateway::new(transport, policy));

    let store: Arc<dyn KeyValueStore> = db.open_store();
    let cache = Arc::new(LocalCache::new(store));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let queue = Arc::new(SyncQueue::new(cache.clone(), gateway.clone(), clock.clone(), 3));
    let connectivity = Arc::new(ConnectivityMonitor::new(Connectivity::Online));
    let activity = Arc::new(ActivityLog::new(cache.clone(), clock, 200));

    Arc::new(PersistenceFacade::new(gateway, cache, queue, connectivity, activity))
}
