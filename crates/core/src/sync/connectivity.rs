//! Connectivity tracking
//!
//! The host shell reports online/offline transitions through
//! [`ConnectivityMonitor::set`]. Components either poll
//! [`ConnectivityMonitor::is_online`], subscribe to the watch channel, or
//! register a callback.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::info;

/// Last reported network reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline => f.write_str("offline"),
        }
    }
}

type ConnectivityHandler = Arc<dyn Fn(Connectivity) + Send + Sync>;

/// Shared holder of the current connectivity state.
pub struct ConnectivityMonitor {
    state: watch::Sender<Connectivity>,
    handlers: RwLock<Vec<ConnectivityHandler>>,
}

impl ConnectivityMonitor {
    pub fn new(initial: Connectivity) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state, handlers: RwLock::new(Vec::new()) }
    }

    pub fn current(&self) -> Connectivity {
        *self.state.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.current().is_online()
    }

    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.state.subscribe()
    }

    /// Register a callback invoked on every state change.
    pub fn on_connectivity_change<F>(&self, handler: F)
    where
        F: Fn(Connectivity) + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }

    /// Record a new state. Returns `true` when it differs from the previous
    /// one; subscribers and callbacks are only notified on change.
    pub fn set(&self, next: Connectivity) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            info!(state = %next, "connectivity changed");
            let handlers: Vec<_> = self.handlers.read().iter().cloned().collect();
            for handler in handlers {
                handler(next);
            }
        }
        changed
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(Connectivity::Online)
    }
}

impl fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("state", &self.current())
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
