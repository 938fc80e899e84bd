//! Reconnect-driven queue replay
//!
//! Watches the [`ConnectivityMonitor`] and runs one sync pass per
//! offline-to-online transition. The worker is started and stopped
//! explicitly; stopping cancels the watch loop and awaits the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::connectivity::{Connectivity, ConnectivityMonitor};
use crate::persistence::PersistenceFacade;

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Background worker that drains the sync queue on reconnect.
pub struct SyncTrigger {
    monitor: Arc<ConnectivityMonitor>,
    facade: Arc<PersistenceFacade>,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl SyncTrigger {
    pub fn new(monitor: Arc<ConnectivityMonitor>, facade: Arc<PersistenceFacade>) -> Self {
        Self { monitor, facade, cancellation: CancellationToken::new(), task_handle: None }
    }

    /// Spawn the watch loop. Calling `start` on a running trigger is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("sync trigger already running");
            return;
        }

        self.cancellation = CancellationToken::new();
        let cancel = self.cancellation.clone();
        let receiver = self.monitor.subscribe();
        let facade = Arc::clone(&self.facade);

        self.task_handle = Some(tokio::spawn(Self::watch_loop(receiver, facade, cancel)));
        info!("sync trigger started");
    }

    /// Cancel the watch loop and wait for it to finish.
    pub async fn stop(&mut self) {
        self.cancellation.cancel();
        if let Some(handle) = self.task_handle.take() {
            match tokio::time::timeout(JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(error = %err, "sync trigger task panicked"),
                Err(_) => warn!("sync trigger did not stop within timeout"),
            }
        }
        info!("sync trigger stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn watch_loop(
        mut receiver: tokio::sync::watch::Receiver<Connectivity>,
        facade: Arc<PersistenceFacade>,
        cancel: CancellationToken,
    ) {
        let mut previous = *receiver.borrow_and_update();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("sync trigger loop cancelled");
                    return;
                }
                changed = receiver.changed() => {
                    if changed.is_err() {
                        debug!("connectivity monitor dropped; sync trigger exiting");
                        return;
                    }
                    let current = *receiver.borrow_and_update();
                    if previous == Connectivity::Offline && current == Connectivity::Online {
                        let report = facade.sync_pending().await;
                        debug!(attempted = report.attempted(), skipped = report.skipped, "reconnect sync pass");
                    }
                    previous = current;
                }
            }
        }
    }
}

impl Drop for SyncTrigger {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("SyncTrigger dropped while running; cancelling");
            self.cancellation.cancel();
        }
    }
}
