//! Retrying request gateway
//!
//! Wraps a [`Transport`] with a per-attempt timeout and bounded linear
//! backoff: after failed attempt `n` (0-based) the gateway waits
//! `base_delay * (n + 1)` before trying again.

use std::sync::Arc;
use std::time::Duration;

use appraisal_common::error::{ErrorClassification, ErrorSeverity};
use appraisal_domain::ApiConfig;
use tracing::{debug, instrument, warn};

use super::ports::{ApiRequest, ApiResponse, GatewayError, Transport};

/// Timeout and retry settings for the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            timeout: config.request_timeout(),
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
        }
    }

    /// Delay before the retry that follows failed attempt `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}

/// Backend entry point used by every data-layer component.
pub struct RequestGateway {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RequestGateway {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Send `request`, retrying any failure (transport error, timeout or
    /// non-2xx status) up to the policy bound.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let mut attempt = 0;
        loop {
            match self.attempt(&request).await {
                Ok(response) => {
                    debug!(attempt, status = response.status, "request succeeded");
                    return Ok(response);
                }
                Err(err) if attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    debug!(
                        attempt,
                        error = %err,
                        transient = err.is_retryable(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.severity() >= ErrorSeverity::Error {
                        warn!(attempt, error = %err, "request rejected by backend");
                    } else {
                        warn!(attempt, error = %err, "request failed after retries");
                    }
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        let response = tokio::time::timeout(self.policy.timeout, self.transport.execute(request))
            .await
            .map_err(|_| GatewayError::Timeout(self.policy.timeout))??;

        if response.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Status { status: response.status, body: response.body.to_string() })
        }
    }
}
