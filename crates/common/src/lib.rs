//! Common utilities shared across appraisal crates.
//!
//! # Feature Tiers
//!
//! - `foundation`: error classification and the wall-clock abstraction
//! - `test-utils`: temporary directories and test tracing setup

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

#[cfg(feature = "foundation")]
pub use error::{classify_http_status, ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
