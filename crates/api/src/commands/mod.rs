//! UI-facing commands
//!
//! Each command checks the session, applies the access policy and then
//! delegates to the persistence facade. Results carry the freshness tag so
//! the UI can flag offline data.

pub mod auth;
pub mod competencies;
pub mod employee;
pub mod goals;
pub mod settings;
pub mod sync;

pub use auth::*;
pub use competencies::*;
pub use employee::*;
pub use goals::*;
pub use settings::*;
pub use sync::*;

use appraisal_domain::{AppraisalError, Result, Role, Session};

use crate::AppContext;

/// The active session, counted as user activity.
pub(crate) fn active_session(ctx: &AppContext) -> Result<Session> {
    let session = ctx.session.ensure_active()?;
    ctx.session.record_activity();
    Ok(session)
}

/// Employees only reach their own records; reviewers and admins reach all.
pub(crate) fn authorize_subject(session: &Session, employee_code: &str) -> Result<()> {
    if session.role != Role::Employee || session.principal_id == employee_code {
        Ok(())
    } else {
        Err(AppraisalError::Auth(format!(
            "{} may not access records of {employee_code}",
            session.principal_id
        )))
    }
}
