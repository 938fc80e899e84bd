//! Application context - dependency injection container

use std::sync::Arc;

use appraisal_common::time::{Clock, SystemClock};
use appraisal_core::gateway::{RequestGateway, RetryPolicy, Transport};
use appraisal_core::persistence::PersistenceFacade;
use appraisal_core::session::{ActivityLog, SessionAuthority};
use appraisal_core::storage::{KeyValueStore, LocalCache};
use appraisal_core::sync::{Connectivity, ConnectivityMonitor, SyncQueue, SyncTrigger};
use appraisal_core::time_window::TimeWindowResolver;
use appraisal_core::AccessPolicy;
use appraisal_domain::constants::ACTIVITY_LOG_CAPACITY;
use appraisal_domain::{Config, EntityKind, GoalSet, Result};
use appraisal_infra::database::{DbManager, SqliteStore};
use appraisal_infra::http::HttpTransport;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

const USER_AGENT: &str = concat!("appraisal/", env!("CARGO_PKG_VERSION"));

/// Pending-changes indicator for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub pending: usize,
    pub draining: bool,
    pub online: bool,
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub facade: Arc<PersistenceFacade>,
    pub session: Arc<SessionAuthority>,
    pub windows: Arc<TimeWindowResolver>,
    pub access: AccessPolicy,
    sync_trigger: Mutex<SyncTrigger>,
}

impl AppContext {
    /// Load configuration from the environment or a config file and build
    /// the context.
    pub async fn new() -> Result<Self> {
        let config = appraisal_infra::config::load()?;
        Self::new_with_config(config).await
    }

    pub async fn new_with_config(config: Config) -> Result<Self> {
        Self::new_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Build every service over SQLite and the HTTP backend, restore any
    /// persisted session, refresh the time windows and start the sync
    /// trigger.
    pub async fn new_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let db = Arc::new(DbManager::from_config(&config.storage)?);
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(db.clone())?);
        let cache = Arc::new(LocalCache::new(store));

        let transport: Arc<dyn Transport> = Arc::new(
            HttpTransport::builder(&config.api.base_url)
                .timeout(config.api.request_timeout().saturating_mul(2))
                .user_agent(USER_AGENT)
                .build()?,
        );
        let gateway =
            Arc::new(RequestGateway::new(transport, RetryPolicy::from_config(&config.api)));

        let queue = Arc::new(SyncQueue::new(
            cache.clone(),
            gateway.clone(),
            clock.clone(),
            config.sync.max_retries,
        ));
        let connectivity = Arc::new(ConnectivityMonitor::new(Connectivity::Online));
        let activity = Arc::new(ActivityLog::new(cache.clone(), clock.clone(), ACTIVITY_LOG_CAPACITY));

        let facade = Arc::new(
            PersistenceFacade::new(gateway, cache, queue, connectivity.clone(), activity)
                .with_validator(EntityKind::Goals, Arc::new(goal_weightage_validator)),
        );

        let session =
            Arc::new(SessionAuthority::new(facade.clone(), clock.clone(), config.session.clone()));
        if let Some(restored) = session.restore() {
            info!(principal_id = %restored.principal_id, "resumed previous session");
        }

        let windows =
            Arc::new(TimeWindowResolver::new(facade.clone(), config.time_windows, clock));
        let resolved = windows.refresh().await;
        info!(source = ?resolved.source, "time windows resolved");

        let access = AccessPolicy::new(windows.clone());

        let mut trigger = SyncTrigger::new(connectivity.clone(), facade.clone());
        trigger.start();

        info!(
            db_path = %db.path().display(),
            base_url = %config.api.base_url,
            pending = facade.queue().len(),
            "application context ready"
        );

        Ok(Self {
            config,
            db,
            connectivity,
            facade,
            session,
            windows,
            access,
            sync_trigger: Mutex::new(trigger),
        })
    }

    pub fn sync_status(&self) -> SyncStatus {
        let queue = self.facade.queue();
        SyncStatus {
            pending: queue.len(),
            draining: queue.is_draining(),
            online: self.connectivity.is_online(),
        }
    }

    pub async fn is_sync_trigger_running(&self) -> bool {
        self.sync_trigger.lock().await.is_running()
    }

    /// Stop background work. Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        self.sync_trigger.lock().await.stop().await;
        if let Err(err) = self.db.health_check() {
            warn!(error = %err, "database unhealthy at shutdown");
        }
        info!("application context shut down");
        Ok(())
    }
}

/// Goal weightages on a sheet may not add up to more than 100.
fn goal_weightage_validator(_kind: EntityKind, payload: &Value) -> std::result::Result<(), String> {
    let goals: GoalSet = serde_json::from_value(payload.clone())
        .map_err(|err| format!("malformed goal sheet: {err}"))?;

    let total = goals.total_weightage();
    if total > 100.0 + f64::EPSILON {
        return Err(format!("goal weightage totals {total}, which exceeds 100"));
    }
    if goals.goals.iter().any(|goal| goal.weightage < 0.0) {
        return Err("goal weightage must not be negative".into());
    }
    Ok(())
}
