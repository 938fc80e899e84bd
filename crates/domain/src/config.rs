//! Configuration structures
//!
//! Loaded by `appraisal_infra::config` from the environment or a JSON/TOML
//! file. Every section has defaults so partial files are accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{AppraisalError, Result};
use crate::types::{WindowName, WindowRanges};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub time_windows: WindowRanges,
}

impl Config {
    /// Reject values that would make the data layer misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppraisalError::Config("api.base_url must not be empty".into()));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(AppraisalError::Config("api.request_timeout_ms must be positive".into()));
        }
        if self.session.timeout_secs == 0 {
            return Err(AppraisalError::Config("session.timeout_secs must be positive".into()));
        }
        if self.session.lockout_threshold == 0 {
            return Err(AppraisalError::Config(
                "session.lockout_threshold must be positive".into(),
            ));
        }
        if self.sync.max_retries == 0 {
            return Err(AppraisalError::Config("sync.max_retries must be positive".into()));
        }
        for name in WindowName::ALL {
            if !self.time_windows.range(name).is_valid() {
                return Err(AppraisalError::Config(format!(
                    "time_windows.{name} must use months 1-12"
                )));
            }
        }
        Ok(())
    }
}

/// Backend and request gateway settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

/// Durable local store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Upper bound on stored bytes; `None` means unbounded.
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORAGE_PATH.to_string(),
            pool_size: DEFAULT_STORAGE_POOL_SIZE,
            quota_bytes: None,
        }
    }
}

/// Sync queue replay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_sync_max_retries")]
    pub max_retries: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { max_retries: DEFAULT_SYNC_MAX_RETRIES }
    }
}

/// Session authority settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: u32,
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn lockout(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            lockout_secs: DEFAULT_LOCKOUT_SECS,
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_base_delay_ms() -> u64 {
    DEFAULT_RETRY_BASE_DELAY_MS
}

fn default_pool_size() -> u32 {
    DEFAULT_STORAGE_POOL_SIZE
}

fn default_sync_max_retries() -> u32 {
    DEFAULT_SYNC_MAX_RETRIES
}

fn default_session_timeout_secs() -> u64 {
    DEFAULT_SESSION_TIMEOUT_SECS
}

fn default_lockout_threshold() -> u32 {
    DEFAULT_LOCKOUT_THRESHOLD
}

fn default_lockout_secs() -> u64 {
    DEFAULT_LOCKOUT_SECS
}
