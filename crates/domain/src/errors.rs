//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the appraisal data layer.
///
/// Transient failures (`Network`, `Storage`) are recovered locally by the
/// persistence facade and never reach UI modules as hard failures. `Auth`,
/// `LoginFailed` and `Lockout` are surfaced as user-visible session
/// transitions. `Validation` only ever originates from business-rule
/// collaborators and is never queued for replay.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum AppraisalError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Login failed: {remaining_attempts} attempt(s) remaining")]
    LoginFailed { remaining_attempts: u32 },

    #[error("Too many failed logins; try again in {remaining_secs}s")]
    Lockout { remaining_secs: u64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppraisalError {
    /// Stable label suitable for structured logs and activity entries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Storage(_) => "storage",
            Self::Auth(_) => "auth",
            Self::LoginFailed { .. } => "login_failed",
            Self::Lockout { .. } => "lockout",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the facade may fall back to the cache or the sync queue.
    pub fn is_recoverable_offline(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<serde_json::Error> for AppraisalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for appraisal operations
pub type Result<T> = std::result::Result<T, AppraisalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_recoverable_offline() {
        assert!(AppraisalError::Network("down".into()).is_recoverable_offline());
        assert!(!AppraisalError::Validation("weightage".into()).is_recoverable_offline());
        assert!(!AppraisalError::Storage("quota".into()).is_recoverable_offline());
        assert!(!AppraisalError::Lockout { remaining_secs: 10 }.is_recoverable_offline());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(AppraisalError::LoginFailed { remaining_attempts: 2 })
            .expect("serialize");
        assert_eq!(json["type"], "LoginFailed");
        assert_eq!(json["detail"]["remaining_attempts"], 2);
    }

    #[test]
    fn display_includes_remaining_attempts() {
        let message = AppraisalError::LoginFailed { remaining_attempts: 3 }.to_string();
        assert!(message.contains('3'));
    }
}
