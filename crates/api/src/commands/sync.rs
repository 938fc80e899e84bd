//! Sync status and connectivity commands

use appraisal_core::sync::Connectivity;
use appraisal_domain::{ActivityEntry, AppraisalError, DrainReport, Result, Role};

use super::active_session;
use crate::context::SyncStatus;
use crate::utils::command_helpers::execute_command;
use crate::AppContext;

pub async fn sync_status(ctx: &AppContext) -> Result<SyncStatus> {
    execute_command("sync::sync_status", || async { Ok(ctx.sync_status()) }).await
}

/// Replay queued changes now instead of waiting for reconnection.
pub async fn sync_now(ctx: &AppContext) -> Result<DrainReport> {
    execute_command("sync::sync_now", || async { Ok(ctx.facade.sync_pending().await) }).await
}

/// Entry point for the platform's online/offline events. Returns whether
/// the state changed.
pub async fn set_connectivity(ctx: &AppContext, online: bool) -> Result<bool> {
    execute_command("sync::set_connectivity", || async {
        let next = if online { Connectivity::Online } else { Connectivity::Offline };
        Ok(ctx.connectivity.set(next))
    })
    .await
}

pub async fn activity_log(ctx: &AppContext) -> Result<Vec<ActivityEntry>> {
    execute_command("sync::activity_log", || async {
        let session = active_session(ctx)?;
        if session.role != Role::Admin {
            return Err(AppraisalError::Auth("administrator role required".into()));
        }
        Ok(ctx.facade.activity().entries())
    })
    .await
}
