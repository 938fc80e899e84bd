//! Scriptable in-memory backend

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use appraisal_core::gateway::{ApiRequest, ApiResponse, GatewayError, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Notify;

/// Pauses one request until released.
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// Route-table transport.
///
/// - `GET` routes answer with the registered body or 404
/// - mutating routes answer 200 unless registered otherwise
/// - paths marked failing answer 503
/// - an offline transport refuses every connection
#[derive(Default)]
pub struct MockTransport {
    offline: AtomicBool,
    routes: Mutex<HashMap<String, ApiResponse>>,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Mutex<Option<Gate>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: &str, path: &str, body: Value) {
        self.respond_with(method, path, ApiResponse::ok(body));
    }

    pub fn respond_with(&self, method: &str, path: &str, response: ApiResponse) {
        self.routes.lock().insert(format!("{method} {path}"), response);
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

    /// Hold the next request until `gate.release` is notified.
    pub fn gate_next(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests.lock().iter().filter(|r| r.path == path).cloned().collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.requests.lock().push(request.clone());

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Connection("network unreachable".into()));
        }
        if self.failing.lock().contains(&request.path) {
            return Ok(ApiResponse { status: 503, body: json!({"error": "unavailable"}) });
        }

        let route = format!("{} {}", request.method.as_str(), request.path);
        if let Some(response) = self.routes.lock().get(&route) {
            return Ok(response.clone());
        }
        if request.method.is_mutating() {
            Ok(ApiResponse::ok(json!({"success": true})))
        } else {
            Ok(ApiResponse { status: 404, body: json!({"error": "not found"}) })
        }
    }
}
