//! # Appraisal Core
//!
//! Offline-first data layer for the appraisal workspace - no
//! infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the durable store and the backend transport
//! - The write-through cache, request gateway and sync queue
//! - The persistence facade every UI module talks to
//! - Time window resolution, session authority and access checks
//!
//! ## Architecture Principles
//! - Only depends on `appraisal-common` and `appraisal-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod access;
pub mod gateway;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod sync;
pub mod time_window;

#[cfg(test)]
mod test_support;

pub use access::AccessPolicy;
pub use gateway::{ApiRequest, ApiResponse, GatewayError, RequestGateway, RetryPolicy, Transport};
pub use persistence::{EntityValidator, Freshness, PersistenceFacade, Tagged};
pub use session::{ActivityLog, SessionAuthority};
pub use storage::{InMemoryStore, KeyValueStore, LocalCache, StorageError};
pub use sync::{Connectivity, ConnectivityMonitor, SyncQueue, SyncTrigger};
pub use time_window::{ResolvedWindows, TimeWindowResolver, WindowSource};
