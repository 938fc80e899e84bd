//! Time window administration commands

use appraisal_core::persistence::Tagged;
use appraisal_core::time_window::ResolvedWindows;
use appraisal_domain::{Result, TimeWindowConfig, WindowName, WindowStatus};

use super::active_session;
use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Current window configuration, refreshed from the backend when reachable.
pub async fn get_time_windows(ctx: &AppContext) -> Result<ResolvedWindows> {
    execute_command("settings::get_time_windows", || async {
        active_session(ctx)?;
        Ok(ctx.windows.refresh().await)
    })
    .await
}

/// Status of every window without contacting the backend.
pub async fn window_statuses(ctx: &AppContext) -> Result<Vec<(WindowName, WindowStatus)>> {
    execute_command("settings::window_statuses", || async {
        active_session(ctx)?;
        Ok(ctx.windows.snapshot())
    })
    .await
}

pub async fn save_time_windows(
    ctx: &AppContext,
    config: TimeWindowConfig,
) -> Result<Tagged<TimeWindowConfig>> {
    execute_command("settings::save_time_windows", || async {
        let session = active_session(ctx)?;
        ctx.access.require_settings_access(Some(&session))?;
        ctx.facade.save_time_window(config).await
    })
    .await
}
