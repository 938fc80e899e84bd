//! # Appraisal Domain
//!
//! Business domain types for the appraisal data layer.
//!
//! This crate contains:
//! - Entities (employees, goal sheets, competency evaluations, time windows)
//! - Sync queue, session and activity log records
//! - Domain error types and Result definitions
//! - Configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other appraisal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
