//! Appraisal - offline-first data layer host
//!
//! Boots configuration, logging and the application context, then keeps the
//! sync trigger running until Ctrl-C.

use anyhow::Context;
use appraisal_lib::utils::logging::init_tracing;
use appraisal_lib::AppContext;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads RUST_LOG.
    let dotenv = dotenvy::dotenv();

    let json_logs = std::env::var("APPRAISAL_LOG_JSON").is_ok_and(|value| value == "1");
    init_tracing(json_logs);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    let ctx = AppContext::new().await.context("failed to initialise application context")?;

    match ctx.session.current_session() {
        Some(session) => info!(principal_id = %session.principal_id, "session active"),
        None => info!("no active session"),
    }

    let status = ctx.sync_status();
    info!(pending = status.pending, online = status.online, "appraisal running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;

    info!("shutting down");
    ctx.shutdown().await.context("shutdown failed")?;
    Ok(())
}
