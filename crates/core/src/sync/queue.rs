//! Persisted FIFO queue of mutations awaiting replay
//!
//! Tasks are appended when a write cannot reach the backend and replayed in
//! enqueue order by [`SyncQueue::drain`]. The queue is persisted through the
//! [`LocalCache`] after every change so it survives restarts.
//!
//! Replay rules:
//! - a successful replay removes the task
//! - a failed replay increments `retry_count`; the task is dropped once the
//!   count reaches the configured bound
//! - once a task on an endpoint fails during a pass, later tasks for the
//!   same endpoint are deferred to the next pass so per-endpoint order holds
//! - at most one pass runs at a time; overlapping calls return a skipped
//!   report without touching the queue

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use appraisal_common::time::Clock;
use appraisal_domain::constants::{SYNC_QUEUE_KEY, SYNC_QUEUE_NAMESPACE};
use appraisal_domain::{DrainReport, HttpMethod, SyncTask};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::gateway::{ApiRequest, RequestGateway};
use crate::storage::LocalCache;

/// Durable representation of the queue.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedQueue {
    next_id: u64,
    tasks: VecDeque<SyncTask>,
}

/// Offline mutation queue.
pub struct SyncQueue {
    cache: Arc<LocalCache>,
    gateway: Arc<RequestGateway>,
    clock: Arc<dyn Clock>,
    max_retries: u32,
    state: parking_lot::Mutex<PersistedQueue>,
    draining: AtomicBool,
}

/// Clears the in-flight flag when a drain pass ends, including on panic.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncQueue {
    /// Create a queue, restoring any tasks persisted by a previous run.
    pub fn new(
        cache: Arc<LocalCache>,
        gateway: Arc<RequestGateway>,
        clock: Arc<dyn Clock>,
        max_retries: u32,
    ) -> Self {
        let mut state: PersistedQueue =
            cache.read(SYNC_QUEUE_NAMESPACE, SYNC_QUEUE_KEY).unwrap_or_default();
        let highest = state.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        state.next_id = state.next_id.max(highest + 1).max(1);

        if !state.tasks.is_empty() {
            info!(pending = state.tasks.len(), "restored persisted sync queue");
        }

        Self {
            cache,
            gateway,
            clock,
            max_retries,
            state: parking_lot::Mutex::new(state),
            draining: AtomicBool::new(false),
        }
    }

    /// Append a mutation and persist the queue. Returns the task id.
    pub fn enqueue(&self, endpoint: impl Into<String>, method: HttpMethod, payload: Value) -> u64 {
        let endpoint = endpoint.into();
        let id = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.tasks.push_back(SyncTask {
                id,
                endpoint: endpoint.clone(),
                method,
                payload,
                enqueued_at: self.clock.now(),
                retry_count: 0,
            });
            id
        };

        info!(task_id = id, endpoint = %endpoint, method = %method, "queued mutation for replay");
        self.persist();
        id
    }

    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }

    /// Snapshot of queued tasks in replay order.
    pub fn pending(&self) -> Vec<SyncTask> {
        self.state.lock().tasks.iter().cloned().collect()
    }

    /// Whether a mutation for `endpoint` is still waiting for replay.
    pub fn has_pending(&self, endpoint: &str) -> bool {
        self.state.lock().tasks.iter().any(|task| task.endpoint == endpoint)
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Replay queued tasks in FIFO order.
    ///
    /// Tasks enqueued while a pass is running are left for the next pass.
    #[instrument(skip(self))]
    pub async fn drain(&self) -> DrainReport {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("drain already in flight; skipping");
            return DrainReport::skipped();
        }
        let _guard = DrainGuard(&self.draining);

        let snapshot = self.pending();
        let mut report = DrainReport::default();
        if snapshot.is_empty() {
            return report;
        }

        let mut blocked: HashSet<String> = HashSet::new();
        for task in snapshot {
            if blocked.contains(&task.endpoint) {
                report.deferred.push(task.id);
                continue;
            }

            let request = ApiRequest::new(task.method, task.endpoint.clone(), Some(task.payload));
            match self.gateway.send(request).await {
                Ok(_) => {
                    self.remove(task.id);
                    report.succeeded.push(task.id);
                }
                Err(err) => match self.record_failure(task.id) {
                    Some(retry_count) if retry_count >= self.max_retries => {
                        self.remove(task.id);
                        warn!(
                            task_id = task.id,
                            endpoint = %task.endpoint,
                            retry_count,
                            error = %err,
                            "dropping mutation after exhausting retries"
                        );
                        report.dropped.push(task.id);
                    }
                    Some(retry_count) => {
                        debug!(task_id = task.id, retry_count, error = %err, "replay failed; task retained");
                        blocked.insert(task.endpoint);
                        report.retained.push(task.id);
                    }
                    None => {}
                },
            }
            self.persist();
        }

        info!(
            succeeded = report.succeeded.len(),
            dropped = report.dropped.len(),
            retained = report.retained.len(),
            deferred = report.deferred.len(),
            "sync drain finished"
        );
        report
    }

    fn record_failure(&self, id: u64) -> Option<u32> {
        let mut state = self.state.lock();
        let task = state.tasks.iter_mut().find(|task| task.id == id)?;
        task.retry_count += 1;
        Some(task.retry_count)
    }

    fn remove(&self, id: u64) {
        self.state.lock().tasks.retain(|task| task.id != id);
    }

    fn persist(&self) {
        let result = {
            let state = self.state.lock();
            self.cache.write(SYNC_QUEUE_NAMESPACE, SYNC_QUEUE_KEY, &*state)
        };
        if let Err(err) = result {
            warn!(error = %err, "failed to persist sync queue");
        }
    }
}

impl std::fmt::Debug for SyncQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncQueue")
            .field("pending", &self.len())
            .field("max_retries", &self.max_retries)
            .field("draining", &self.is_draining())
            .finish()
    }
}
