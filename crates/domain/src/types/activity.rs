//! Persisted activity log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_domain_enum_conversions;

/// Event kinds recorded in the local activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    LoginFailed,
    Locked,
    Logout,
    Expired,
    SyncReplayed,
    SyncDropped,
}

impl_domain_enum_conversions!(ActivityKind {
    Login => "login",
    LoginFailed => "login_failed",
    Locked => "locked",
    Logout => "logout",
    Expired => "expired",
    SyncReplayed => "sync_replayed",
    SyncDropped => "sync_dropped",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub kind: ActivityKind,
    #[serde(default)]
    pub principal_id: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ActivityEntry {
    pub fn new(kind: ActivityKind, at: DateTime<Utc>) -> Self {
        Self { id: Uuid::new_v4(), at, kind, principal_id: None, detail: None }
    }

    pub fn with_principal(mut self, principal_id: impl Into<String>) -> Self {
        self.principal_id = Some(principal_id.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
