//! Sign-in and session commands

use appraisal_domain::{Result, Session, SessionState};
use tracing::info;

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

pub async fn login(ctx: &AppContext, employee_code: &str) -> Result<Session> {
    execute_command("auth::login", || async {
        let session = ctx.session.login(employee_code).await?;
        // Window settings may have changed since the last sign-in.
        ctx.windows.refresh().await;
        info!(principal_id = %session.principal_id, offline = session.offline, "signed in");
        Ok(session)
    })
    .await
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    execute_command("auth::logout", || async {
        ctx.session.logout();
        Ok(())
    })
    .await
}

pub async fn session_state(ctx: &AppContext) -> Result<SessionState> {
    execute_command("auth::session_state", || async { Ok(ctx.session.state()) }).await
}

pub async fn extend_session(ctx: &AppContext) -> Result<Session> {
    execute_command("auth::extend_session", || async { ctx.session.extend() }).await
}
