//! Goal sheet commands

use appraisal_core::persistence::Tagged;
use appraisal_domain::{AppraisalError, GoalSet, Result, WindowName};

use super::{active_session, authorize_subject};
use crate::utils::command_helpers::execute_command;
use crate::AppContext;

pub async fn get_goals(ctx: &AppContext, employee_code: &str) -> Result<Tagged<GoalSet>> {
    execute_command("goals::get_goals", || async {
        let session = active_session(ctx)?;
        authorize_subject(&session, employee_code)?;
        ctx.facade.goals(employee_code).await
    })
    .await
}

/// Save a goal sheet edited during `phase`: goal setting, mid-year or
/// year-end review. The phase's window must be open for editing.
pub async fn save_goals(ctx: &AppContext, phase: WindowName, goals: GoalSet) -> Result<Tagged<GoalSet>> {
    execute_command("goals::save_goals", || async {
        if phase == WindowName::Competency {
            return Err(AppraisalError::InvalidInput(
                "goal sheets are not edited in the competency window".into(),
            ));
        }

        let session = active_session(ctx)?;
        authorize_subject(&session, &goals.employee_code)?;
        ctx.access.require_edit(phase, Some(&session))?;
        ctx.facade.save_goals(goals).await
    })
    .await
}
