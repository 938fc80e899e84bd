//! Local persistence: the durable store port and the write-through cache.

pub mod cache;
pub mod memory;
pub mod ports;

pub use cache::LocalCache;
pub use memory::InMemoryStore;
pub use ports::{KeyValueStore, StorageError};
