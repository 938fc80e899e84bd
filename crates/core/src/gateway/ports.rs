//! Port interfaces for the backend transport

use std::time::Duration;

use appraisal_common::error::{classify_http_status, ErrorClassification, ErrorSeverity};
use appraisal_domain::{AppraisalError, HttpMethod, Route};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A single backend request. Paths are relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Get, path: path.into(), body: None }
    }

    pub fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        Self { method, path: path.into(), body }
    }

    pub fn from_route(route: Route, body: Option<Value>) -> Self {
        Self { method: route.method, path: route.path, body }
    }
}

/// Raw backend response. The transport reports every status code; the
/// gateway decides what counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend explicitly refused the caller (401/403/404).
    pub fn is_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403 | 404))
    }
}

impl ErrorClassification for GatewayError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Status { status, .. } => {
                classify_http_status(*status).is_some_and(|(retryable, _)| retryable)
            }
            Self::InvalidRequest(_) => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Timeout(_) | Self::Connection(_) => ErrorSeverity::Warning,
            Self::Status { status, .. } => {
                classify_http_status(*status).map_or(ErrorSeverity::Info, |(_, severity)| severity)
            }
            Self::InvalidRequest(_) => ErrorSeverity::Error,
        }
    }
}

impl From<GatewayError> for AppraisalError {
    fn from(err: GatewayError) -> Self {
        AppraisalError::Network(err.to_string())
    }
}

/// Performs exactly one request attempt against the backend.
///
/// Retry, timeout and backoff policy live in
/// [`RequestGateway`](super::RequestGateway), not in implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError>;
}
