//! Session and account-lock records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::employee::Role;

/// Authenticated session owned by the session authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub principal_id: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// True when the login was satisfied from the local cache.
    #[serde(default)]
    pub offline: bool,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_activity) >= timeout
    }
}

/// Observable state of the session authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Session),
    Expired,
    LoggedOut,
    Locked { until: DateTime<Utc> },
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Failed-login bookkeeping, counted per browser rather than per principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLock {
    pub failed_attempts: u32,
    #[serde(default)]
    pub locked_until: Option<DateTime<Utc>>,
}

impl AccountLock {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.locked_until.filter(|until| now < *until).map(|until| until - now)
    }
}
