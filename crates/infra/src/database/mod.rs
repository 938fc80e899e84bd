//! SQLite persistence for the local cache.

pub mod kv_store;
pub mod manager;

pub use kv_store::SqliteStore;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
