use std::time::Duration;

use appraisal_core::gateway::{ApiRequest, ApiResponse, GatewayError, Transport};
use appraisal_domain::{AppraisalError, HttpMethod};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// reqwest-backed [`Transport`]. Performs exactly one attempt per call;
/// retries and the per-attempt deadline belong to the gateway.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    base_url: Url,
}

impl HttpTransport {
    /// Start building a new transport rooted at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a backend path against the base URL. The base always ends with
    /// a slash, so `/goals/E1` under `https://hr/api/` becomes
    /// `https://hr/api/goals/E1`.
    pub fn url_for(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| GatewayError::InvalidRequest(format!("bad path {path}: {err}")))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").field("base_url", &self.base_url.as_str()).finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        let url = self.url_for(&request.path)?;
        let method = to_reqwest_method(request.method);

        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(%method, %url, "sending HTTP request");

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_send_error)?;

        debug!(%method, %url, %status, bytes = bytes.len(), "received HTTP response");

        Ok(ApiResponse { status: status.as_u16(), body: decode_body(&bytes) })
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl HttpTransportBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: None, user_agent: None, default_headers: None }
    }

    /// Hard ceiling enforced by reqwest. The gateway applies its own
    /// per-attempt timeout, so this is only a backstop.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpTransport, AppraisalError> {
        let base_url = parse_base_url(&self.base_url)?;

        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            AppraisalError::from(infra)
        })?;

        Ok(HttpTransport { client, base_url })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AppraisalError> {
    let trimmed = raw.trim();
    let normalized =
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{trimmed}/") };

    let url = Url::parse(&normalized)
        .map_err(|err| AppraisalError::Config(format!("invalid api.base_url {raw}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppraisalError::Config(format!("unsupported api.base_url scheme: {other}"))),
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Empty bodies become `null`; anything that is not JSON is kept as a string
/// so error payloads survive into `GatewayError::Status`.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn map_send_error(err: reqwest::Error) -> GatewayError {
    if err.is_builder() {
        return GatewayError::InvalidRequest(err.to_string());
    }
    let infra: InfraError = err.into();
    GatewayError::Connection(AppraisalError::from(infra).to_string())
}
