//! Configuration loader
//!
//! Loads the data-layer configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Attempt to load from environment variables (`APPRAISAL_API_BASE_URL`
//!    must be set)
//! 2. Otherwise probe for a config file (JSON or TOML by extension)
//! 3. Otherwise use the built-in defaults
//!
//! Every result is validated before it is returned.
//!
//! ## Environment Variables
//! - `APPRAISAL_API_BASE_URL`: Backend base URL (required for env loading)
//! - `APPRAISAL_REQUEST_TIMEOUT_MS`: Per-attempt request timeout
//! - `APPRAISAL_MAX_RETRIES`: Gateway retries after the first attempt
//! - `APPRAISAL_RETRY_BASE_DELAY_MS`: Linear backoff unit
//! - `APPRAISAL_STORAGE_PATH`: SQLite file path
//! - `APPRAISAL_STORAGE_QUOTA_BYTES`: Optional storage quota
//! - `APPRAISAL_SYNC_MAX_RETRIES`: Replay attempts before a task is dropped
//! - `APPRAISAL_SESSION_TIMEOUT_SECS`: Inactivity timeout
//! - `APPRAISAL_LOCKOUT_THRESHOLD`: Failed logins before lockout
//! - `APPRAISAL_LOCKOUT_SECS`: Lockout duration
//!
//! ## File Locations
//! The loader probes, in order, `config.{json,toml}` and
//! `appraisal.{json,toml}` in the working directory, its two parents, and
//! next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use appraisal_domain::{AppraisalError, Config, Result};

const FILE_STEMS: [&str; 2] = ["config", "appraisal"];
const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `AppraisalError::Config` when the chosen source is malformed or
/// the resulting configuration fails validation.
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path))?,
                None => {
                    tracing::info!("No config file found, using defaults");
                    Config::default()
                }
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables.
///
/// `APPRAISAL_API_BASE_URL` is required; every other variable falls back to
/// its default when unset.
///
/// # Errors
/// Returns `AppraisalError::Config` if the base URL is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var("APPRAISAL_API_BASE_URL")?;
    if let Some(value) = env_parse("APPRAISAL_REQUEST_TIMEOUT_MS")? {
        config.api.request_timeout_ms = value;
    }
    if let Some(value) = env_parse("APPRAISAL_MAX_RETRIES")? {
        config.api.max_retries = value;
    }
    if let Some(value) = env_parse("APPRAISAL_RETRY_BASE_DELAY_MS")? {
        config.api.retry_base_delay_ms = value;
    }

    if let Ok(path) = std::env::var("APPRAISAL_STORAGE_PATH") {
        config.storage.path = path;
    }
    if let Some(value) = env_parse("APPRAISAL_STORAGE_QUOTA_BYTES")? {
        config.storage.quota_bytes = Some(value);
    }

    if let Some(value) = env_parse("APPRAISAL_SYNC_MAX_RETRIES")? {
        config.sync.max_retries = value;
    }

    if let Some(value) = env_parse("APPRAISAL_SESSION_TIMEOUT_SECS")? {
        config.session.timeout_secs = value;
    }
    if let Some(value) = env_parse("APPRAISAL_LOCKOUT_THRESHOLD")? {
        config.session.lockout_threshold = value;
    }
    if let Some(value) = env_parse("APPRAISAL_LOCKOUT_SECS")? {
        config.session.lockout_secs = value;
    }

    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `AppraisalError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AppraisalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AppraisalError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AppraisalError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AppraisalError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AppraisalError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AppraisalError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    candidates_in(&roots).into_iter().find(|path| path.exists())
}

fn candidates_in(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| {
            FILE_STEMS.iter().flat_map(move |stem| {
                EXTENSIONS.iter().map(move |ext| root.join(format!("{stem}.{ext}")))
            })
        })
        .collect()
}

/// Get required environment variable.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AppraisalError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppraisalError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}
