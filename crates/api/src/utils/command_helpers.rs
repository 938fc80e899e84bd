//! Command execution helpers
//!
//! Every UI-facing command runs through [`execute_command`] so timing and
//! outcome logging stay uniform.

use std::future::Future;
use std::time::Instant;

use appraisal_domain::Result as DomainResult;

use crate::utils::logging::log_command_execution;

/// Run `command_fn`, then log its duration and outcome under `command_name`.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn get_goals(ctx: &AppContext, code: &str) -> Result<Tagged<GoalSet>> {
///     execute_command("goals::get_goals", || async {
///         ctx.session.ensure_active()?;
///         ctx.facade.goals(code).await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().map(|_| ()));

    result
}
