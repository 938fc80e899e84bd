//! Offline mutation replay: the persisted queue, connectivity tracking and
//! the reconnect trigger.

pub mod connectivity;
pub mod queue;
pub mod trigger;

pub use connectivity::{Connectivity, ConnectivityMonitor};
pub use queue::SyncQueue;
pub use trigger::SyncTrigger;
