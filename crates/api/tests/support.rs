//! Shared helpers for `appraisal-app` integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use appraisal_common::testing::{init_test_tracing, TempDir};
use appraisal_common::time::MockClock;
use appraisal_domain::{Config, Role};
use appraisal_lib::AppContext;
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Context wired to a mock backend and a throwaway SQLite file.
pub struct TestApp {
    pub ctx: AppContext,
    pub server: MockServer,
    pub clock: MockClock,
    pub config: Config,
    pub dir: Arc<TempDir>,
}

impl TestApp {
    /// Build a context pinned to 15 April 2026 (goal setting open, mid-year
    /// closed).
    pub async fn start() -> Self {
        init_test_tracing();
        let server = MockServer::start().await;
        let dir = Arc::new(TempDir::new("appraisal-app-test").expect("temp dir"));
        let clock = MockClock::at(Utc.with_ymd_and_hms(2026, 4, 15, 9, 0, 0).unwrap());
        let config = test_config(&server, &dir);

        let ctx = AppContext::new_with_clock(config.clone(), Arc::new(clock.clone()))
            .await
            .expect("context should build");

        Self { ctx, server, clock, config, dir }
    }

    /// Shut down and rebuild over the same database and backend.
    pub async fn restart(self) -> Self {
        self.ctx.shutdown().await.expect("shutdown");
        drop(self.ctx);

        let ctx = AppContext::new_with_clock(self.config.clone(), Arc::new(self.clock.clone()))
            .await
            .expect("context should rebuild");

        Self { ctx, server: self.server, clock: self.clock, config: self.config, dir: self.dir }
    }

    /// Accept `employee_code` at `/auth` with `role`.
    pub async fn allow_login(&self, employee_code: &str, role: Role) {
        Mock::given(method("POST"))
            .and(path("/api/auth"))
            .and(body_partial_json(json!({"employeeCode": employee_code})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "employeeCode": employee_code,
                "name": format!("Employee {employee_code}"),
                "role": role.to_string(),
            })))
            .mount(&self.server)
            .await;
    }

    /// Accept every write to `route` with 200.
    pub async fn accept_writes(&self, http_method: &str, route: &str) {
        Mock::given(method(http_method))
            .and(path(format!("/api{route}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, route: &str) -> usize {
        let full = format!("/api{route}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == full)
            .count()
    }

    /// Poll until the queue is empty or `timeout` elapses.
    pub async fn wait_for_empty_queue(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.ctx.sync_status().pending == 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.ctx.sync_status().pending == 0
    }
}

fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.api.request_timeout_ms = 2_000;
    config.api.max_retries = 0;
    config.api.retry_base_delay_ms = 10;
    config.storage.path = dir.path().join("appraisal.db").to_string_lossy().into_owned();
    config.storage.pool_size = 2;
    config
}
