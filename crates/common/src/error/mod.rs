//! Error classification shared across appraisal crates
//!
//! Component errors (storage, transport) implement [`ErrorClassification`]
//! so callers can decide uniformly whether to retry, how loudly to log and
//! whether a failure threatens data integrity.
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Cache miss, empty queue |
//! | **Warning** | Degraded but operational | Offline fallback, quota reached |
//! | **Error** | Failure requiring attention | Bad configuration, rejected request |
//! | **Critical** | Integrity at risk | Corrupt persisted queue |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use appraisal_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum UploadError {
//!     Timeout,
//!     Rejected,
//! }
//!
//! impl ErrorClassification for UploadError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Timeout => ErrorSeverity::Warning,
//!             Self::Rejected => ErrorSeverity::Error,
//!         }
//!     }
//! }
//!
//! assert!(UploadError::Timeout.is_retryable());
//! assert!(!UploadError::Rejected.is_critical());
//! assert_eq!(UploadError::Timeout.retry_after(), None::<Duration>);
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again: timeouts, refused connections, 5xx responses, a busy store.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Classify an HTTP status code.
///
/// Returns `None` for 2xx. Server errors, 408 and 429 are retryable warnings;
/// other client errors are non-retryable errors.
pub fn classify_http_status(status: u16) -> Option<(bool, ErrorSeverity)> {
    match status {
        200..=299 => None,
        408 | 429 => Some((true, ErrorSeverity::Warning)),
        500..=599 => Some((true, ErrorSeverity::Warning)),
        _ => Some((false, ErrorSeverity::Error)),
    }
}
