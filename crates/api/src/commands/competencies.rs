//! Competency evaluation commands

use appraisal_core::persistence::Tagged;
use appraisal_domain::{CompetencyDefinition, CompetencyEvaluation, Result, WindowName};

use super::{active_session, authorize_subject};
use crate::utils::command_helpers::execute_command;
use crate::AppContext;

pub async fn get_competencies(
    ctx: &AppContext,
    employee_code: &str,
) -> Result<Tagged<CompetencyEvaluation>> {
    execute_command("competencies::get_competencies", || async {
        let session = active_session(ctx)?;
        authorize_subject(&session, employee_code)?;
        ctx.facade.competencies(employee_code).await
    })
    .await
}

pub async fn save_competencies(
    ctx: &AppContext,
    evaluation: CompetencyEvaluation,
) -> Result<Tagged<CompetencyEvaluation>> {
    execute_command("competencies::save_competencies", || async {
        let session = active_session(ctx)?;
        authorize_subject(&session, &evaluation.employee_code)?;
        ctx.access.require_edit(WindowName::Competency, Some(&session))?;
        ctx.facade.save_competencies(evaluation).await
    })
    .await
}

pub async fn get_competency_master(ctx: &AppContext) -> Result<Tagged<Vec<CompetencyDefinition>>> {
    execute_command("competencies::get_competency_master", || async {
        active_session(ctx)?;
        ctx.facade.competency_master().await
    })
    .await
}
