//! Fixtures shared by unit tests in this crate.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use appraisal_common::time::{Clock, MockClock};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::gateway::{
    ApiRequest, ApiResponse, GatewayError, RequestGateway, RetryPolicy, Transport,
};
use crate::storage::{InMemoryStore, LocalCache};

/// Transport backed by a route table. Unknown routes answer 404, routes
/// marked failing answer 503 and an offline transport refuses to connect.
#[derive(Default)]
pub struct MockTransport {
    offline: AtomicBool,
    routes: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: &str, path: &str, body: Value) {
        self.routes.lock().insert(format!("{method} {path}"), body);
    }

    pub fn fail(&self, path: &str) {
        self.failing.lock().insert(path.to_string());
    }

    pub fn heal(&self, path: &str) {
        self.failing.lock().remove(path);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.requests.lock().push(request.clone());
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Connection("network unreachable".into()));
        }
        if self.failing.lock().contains(&request.path) {
            return Ok(ApiResponse { status: 503, body: json!({"error": "unavailable"}) });
        }
        let route = format!("{} {}", request.method.as_str(), request.path);
        match self.routes.lock().get(&route) {
            Some(body) => Ok(ApiResponse::ok(body.clone())),
            None if request.method.is_mutating() => Ok(ApiResponse::ok(json!({"success": true}))),
            None => Ok(ApiResponse { status: 404, body: json!({"error": "not found"}) }),
        }
    }
}

/// Gateway with no retries and zero backoff.
pub fn gateway(transport: Arc<MockTransport>) -> Arc<RequestGateway> {
    let policy = RetryPolicy {
        timeout: Duration::from_secs(5),
        max_retries: 0,
        base_delay: Duration::ZERO,
    };
    Arc::new(RequestGateway::new(transport, policy))
}

pub fn cache() -> (Arc<InMemoryStore>, Arc<LocalCache>) {
    let store = Arc::new(InMemoryStore::new());
    let cache = Arc::new(LocalCache::new(store.clone()));
    (store, cache)
}

/// Mock clock pinned to 1 April 2026, 09:00 UTC.
pub fn clock() -> (MockClock, Arc<dyn Clock>) {
    let clock = MockClock::at(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap());
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    (clock, shared)
}
