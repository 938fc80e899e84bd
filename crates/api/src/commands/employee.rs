//! Employee profile commands

use appraisal_core::persistence::Tagged;
use appraisal_domain::{AppraisalError, EmployeeRecord, PerformanceSummary, Result, Role};

use super::{active_session, authorize_subject};
use crate::utils::command_helpers::execute_command;
use crate::AppContext;

pub async fn get_employee(ctx: &AppContext, employee_code: &str) -> Result<Tagged<EmployeeRecord>> {
    execute_command("employee::get_employee", || async {
        let session = active_session(ctx)?;
        authorize_subject(&session, employee_code)?;
        ctx.facade.employee(employee_code).await
    })
    .await
}

/// Profile edits are an admin task.
pub async fn update_employee(
    ctx: &AppContext,
    record: EmployeeRecord,
) -> Result<Tagged<EmployeeRecord>> {
    execute_command("employee::update_employee", || async {
        let session = active_session(ctx)?;
        if session.role != Role::Admin {
            return Err(AppraisalError::Auth("administrator role required".into()));
        }
        ctx.facade.update_employee(record).await
    })
    .await
}

pub async fn get_performance_summary(
    ctx: &AppContext,
    employee_code: &str,
) -> Result<Tagged<PerformanceSummary>> {
    execute_command("employee::get_performance_summary", || async {
        let session = active_session(ctx)?;
        authorize_subject(&session, employee_code)?;
        ctx.facade.performance_summary(employee_code).await
    })
    .await
}
