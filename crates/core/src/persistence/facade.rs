//! Single data-access entry point for UI modules
//!
//! Every entity kind goes through the same policy:
//!
//! - **read**: try the backend, write the response through to the cache and
//!   return it as [`Freshness::Live`]; on any failure serve the cached copy
//!   as [`Freshness::Stale`]. Only a failure with an empty cache is an error.
//! - **write**: validate, then try the backend and write through on success.
//!   On failure the value is written optimistically to the cache and queued
//!   for replay, tagged [`Freshness::Queued`].
//! - while a write to an entity is still queued, reads serve the local copy
//!   as [`Freshness::Queued`] and later saves to it queue behind the first.
//!
//! While the connectivity monitor reports offline the backend is not
//! contacted at all.

use std::collections::HashMap;
use std::sync::Arc;

use appraisal_domain::{
    ActivityKind, AppraisalError, CompetencyDefinition, CompetencyEvaluation, DrainReport,
    EmployeeRecord, EntityKind, GoalSet, HttpMethod, PerformanceSummary, Result,
    TimeWindowConfig,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::ports::EntityValidator;
use super::tagged::Tagged;
use crate::gateway::{ApiRequest, RequestGateway};
use crate::session::ActivityLog;
use crate::storage::LocalCache;
use crate::sync::{ConnectivityMonitor, SyncQueue};

/// Login endpoint.
pub const AUTH_PATH: &str = "/auth";

/// Composes cache, gateway and sync queue behind one API.
pub struct PersistenceFacade {
    gateway: Arc<RequestGateway>,
    cache: Arc<LocalCache>,
    queue: Arc<SyncQueue>,
    connectivity: Arc<ConnectivityMonitor>,
    activity: Arc<ActivityLog>,
    validators: HashMap<EntityKind, Vec<Arc<dyn EntityValidator>>>,
}

impl PersistenceFacade {
    pub fn new(
        gateway: Arc<RequestGateway>,
        cache: Arc<LocalCache>,
        queue: Arc<SyncQueue>,
        connectivity: Arc<ConnectivityMonitor>,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self { gateway, cache, queue, connectivity, activity, validators: HashMap::new() }
    }

    /// Register a validator run before every save of `kind`.
    pub fn with_validator(mut self, kind: EntityKind, validator: Arc<dyn EntityValidator>) -> Self {
        self.validators.entry(kind).or_default().push(validator);
        self
    }

    pub fn cache(&self) -> &Arc<LocalCache> {
        &self.cache
    }

    pub fn queue(&self) -> &Arc<SyncQueue> {
        &self.queue
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    pub fn activity(&self) -> &Arc<ActivityLog> {
        &self.activity
    }

    /// Cached copy of an entity without contacting the backend.
    pub fn cached<T: DeserializeOwned>(&self, kind: EntityKind, key: &str) -> Option<T> {
        self.cache.read(kind.namespace(), key)
    }

    /// Fetch an entity, falling back to the cache when the backend fails.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn get<T: DeserializeOwned>(&self, kind: EntityKind, key: &str) -> Result<Tagged<T>> {
        let namespace = kind.namespace();

        // The optimistic copy wins until its queued write has been replayed.
        if self.has_queued_write(kind, key) {
            if let Some(value) = self.cache.read::<T>(namespace, key) {
                debug!(key, "serving locally modified entity awaiting replay");
                return Ok(Tagged::queued(value));
            }
        }

        let request = ApiRequest::from_route(kind.read_route(key), None);
        let failure = match self.fetch_live::<T>(request).await {
            Ok((value, body)) => {
                if let Err(err) = self.cache.write_value(namespace, key, body) {
                    warn!(key, error = %err, "could not cache fetched entity");
                }
                return Ok(Tagged::live(value));
            }
            Err(err) => err,
        };

        match self.cache.read::<T>(namespace, key) {
            Some(value) => {
                debug!(key, reason = %failure, "serving cached entity");
                Ok(Tagged::stale(value))
            }
            None => Err(failure.into()),
        }
    }

    /// Save an entity, queueing it for replay when the backend fails.
    ///
    /// Returns only after either the backend confirmed the write or the
    /// value has been cached and queued.
    #[instrument(skip(self, value), fields(kind = %kind))]
    pub async fn save<T: Serialize>(&self, kind: EntityKind, key: &str, value: T) -> Result<Tagged<T>> {
        let route = kind
            .write_route(key)
            .ok_or_else(|| AppraisalError::InvalidInput(format!("{kind} is read-only")))?;
        let payload = serde_json::to_value(&value)?;
        self.validate(kind, &payload)?;

        let namespace = kind.namespace();
        // Earlier writes to the same route are still queued; go behind them.
        let queued_ahead = self.queue.has_pending(&route.path);
        if self.connectivity.is_online() && !queued_ahead {
            let request = ApiRequest::from_route(route.clone(), Some(payload.clone()));
            match self.gateway.send(request).await {
                Ok(_) => {
                    if let Err(err) = self.cache.write_value(namespace, key, payload) {
                        warn!(key, error = %err, "could not cache saved entity");
                    }
                    return Ok(Tagged::live(value));
                }
                Err(err) => warn!(key, error = %err, "save failed; queueing for replay"),
            }
        }

        if let Err(err) = self.cache.write_value(namespace, key, payload.clone()) {
            warn!(key, error = %err, "optimistic cache write failed");
        }
        let task_id = self.queue.enqueue(route.path, route.method, payload);
        debug!(key, task_id, "entity queued");
        Ok(Tagged::queued(value))
    }

    /// Employee lookup used by login. Explicit rejections (401/403/404)
    /// are final; other failures fall back to the cached record.
    #[instrument(skip(self))]
    pub async fn authenticate(&self, employee_code: &str) -> Result<Tagged<EmployeeRecord>> {
        let code = employee_code.trim();
        if code.is_empty() {
            return Err(AppraisalError::InvalidInput("employee code is required".into()));
        }
        let namespace = EntityKind::Employee.namespace();

        let request =
            ApiRequest::new(HttpMethod::Post, AUTH_PATH, Some(json!({ "employeeCode": code })));
        let failure = match self.fetch_live::<EmployeeRecord>(request).await {
            Ok((record, body)) => {
                if let Err(err) = self.cache.write_value(namespace, code, body) {
                    warn!(error = %err, "could not cache employee record");
                }
                return Ok(Tagged::live(record));
            }
            Err(FetchError::Rejected(status)) => {
                return Err(AppraisalError::Auth(format!(
                    "employee {code} was rejected by the backend (HTTP {status})"
                )));
            }
            Err(err) => AppraisalError::from(err),
        };

        self.cache
            .read::<EmployeeRecord>(namespace, code)
            .map(Tagged::stale)
            .ok_or(failure)
    }

    pub async fn employee(&self, employee_code: &str) -> Result<Tagged<EmployeeRecord>> {
        self.get(EntityKind::Employee, employee_code).await
    }

    pub async fn update_employee(&self, record: EmployeeRecord) -> Result<Tagged<EmployeeRecord>> {
        let key = record.employee_code.clone();
        self.save(EntityKind::Employee, &key, record).await
    }

    pub async fn goals(&self, employee_code: &str) -> Result<Tagged<GoalSet>> {
        self.get(EntityKind::Goals, employee_code).await
    }

    /// Recompute goal scores, then save.
    pub async fn save_goals(&self, mut goals: GoalSet) -> Result<Tagged<GoalSet>> {
        goals.recalculate();
        let key = goals.employee_code.clone();
        self.save(EntityKind::Goals, &key, goals).await
    }

    pub async fn competencies(&self, employee_code: &str) -> Result<Tagged<CompetencyEvaluation>> {
        self.get(EntityKind::Competencies, employee_code).await
    }

    /// Recompute competency totals, then save.
    pub async fn save_competencies(
        &self,
        mut evaluation: CompetencyEvaluation,
    ) -> Result<Tagged<CompetencyEvaluation>> {
        evaluation.recalculate();
        let key = evaluation.employee_code.clone();
        self.save(EntityKind::Competencies, &key, evaluation).await
    }

    pub async fn competency_master(&self) -> Result<Tagged<Vec<CompetencyDefinition>>> {
        self.get(EntityKind::CompetencyMaster, singleton_key(EntityKind::CompetencyMaster)).await
    }

    pub async fn performance_summary(&self, employee_code: &str) -> Result<Tagged<PerformanceSummary>> {
        self.get(EntityKind::PerformanceSummary, employee_code).await
    }

    /// Admin-authored time window configuration.
    pub async fn time_window(&self) -> Result<Tagged<TimeWindowConfig>> {
        self.get(EntityKind::SystemConfig, singleton_key(EntityKind::SystemConfig)).await
    }

    pub async fn save_time_window(&self, config: TimeWindowConfig) -> Result<Tagged<TimeWindowConfig>> {
        self.save(EntityKind::SystemConfig, singleton_key(EntityKind::SystemConfig), config).await
    }

    /// Replay queued mutations if online and record the outcome.
    pub async fn sync_pending(&self) -> DrainReport {
        if !self.connectivity.is_online() {
            debug!("offline; sync deferred");
            return DrainReport::skipped();
        }

        let report = self.queue.drain().await;
        if !report.succeeded.is_empty() {
            self.activity.record(
                ActivityKind::SyncReplayed,
                None,
                Some(format!("{} queued change(s) synced", report.succeeded.len())),
            );
        }
        for task_id in &report.dropped {
            self.activity.record(
                ActivityKind::SyncDropped,
                None,
                Some(format!("task {task_id} discarded after repeated failures")),
            );
        }
        if report.attempted() > 0 {
            info!(pending = self.queue.len(), "sync pass recorded");
        }
        report
    }

    fn has_queued_write(&self, kind: EntityKind, key: &str) -> bool {
        kind.write_route(key).is_some_and(|route| self.queue.has_pending(&route.path))
    }

    fn validate(&self, kind: EntityKind, payload: &Value) -> Result<()> {
        for validator in self.validators.get(&kind).into_iter().flatten() {
            validator.validate(kind, payload).map_err(AppraisalError::Validation)?;
        }
        Ok(())
    }

    /// One backend round trip decoded into `T`. Returns the raw body too so
    /// it can be cached verbatim.
    async fn fetch_live<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<(T, Value), FetchError> {
        if !self.connectivity.is_online() {
            return Err(FetchError::Offline);
        }
        let response = self.gateway.send(request).await.map_err(|err| match err.status() {
            Some(status) if err.is_rejection() => FetchError::Rejected(status),
            _ => FetchError::Network(err.to_string()),
        })?;
        let value = serde_json::from_value(response.body.clone())
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        Ok((value, response.body))
    }
}

fn singleton_key(kind: EntityKind) -> &'static str {
    kind.singleton_key().unwrap_or_default()
}

/// Why a live fetch did not produce a value.
#[derive(Debug)]
enum FetchError {
    Offline,
    Rejected(u16),
    Network(String),
    Decode(String),
}

impl From<FetchError> for AppraisalError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Offline => AppraisalError::Network("offline".into()),
            FetchError::Rejected(status) => {
                AppraisalError::Network(format!("backend returned HTTP {status}"))
            }
            FetchError::Network(msg) => AppraisalError::Network(msg),
            FetchError::Decode(msg) => {
                AppraisalError::Serialization(format!("unexpected backend payload: {msg}"))
            }
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline => f.write_str("offline"),
            Self::Rejected(status) => write!(f, "rejected with HTTP {status}"),
            Self::Network(msg) => write!(f, "network failure: {msg}"),
            Self::Decode(msg) => write!(f, "undecodable response: {msg}"),
        }
    }
}
