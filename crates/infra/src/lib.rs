//! # Appraisal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite key/value store behind the local cache
//! - The reqwest transport behind the request gateway
//! - Configuration loading (environment, JSON, TOML)
//!
//! ## Architecture
//! - Implements traits defined in `appraisal-core`
//! - Contains all "impure" code (filesystem, sockets)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use database::{DbManager, SqliteStore};
pub use errors::InfraError;
pub use http::{HttpTransport, HttpTransportBuilder};
