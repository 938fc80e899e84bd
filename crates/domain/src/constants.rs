//! Application constants
//!
//! Centralized location for domain-level defaults used throughout the
//! application.

// Request gateway defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

// Sync queue
pub const DEFAULT_SYNC_MAX_RETRIES: u32 = 3;

// Session authority
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 30 * 60;
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;
pub const DEFAULT_LOCKOUT_SECS: u64 = 15 * 60;

// Local storage
pub const DEFAULT_STORAGE_PATH: &str = "appraisal.db";
pub const DEFAULT_STORAGE_POOL_SIZE: u32 = 4;
pub const ACTIVITY_LOG_CAPACITY: usize = 200;

// Calendar fallback ranges (inclusive, 1-based months)
pub const GOAL_SETTING_MONTHS: (u32, u32) = (4, 5);
pub const MID_YEAR_MONTHS: (u32, u32) = (10, 11);
pub const YEAR_END_MONTHS: (u32, u32) = (3, 4);
pub const COMPETENCY_MONTHS: (u32, u32) = (3, 4);

// Cache namespaces that are not entity kinds
pub const SYNC_QUEUE_NAMESPACE: &str = "sync_queue";
pub const SYNC_QUEUE_KEY: &str = "pending";
pub const SESSION_NAMESPACE: &str = "session";
pub const SESSION_KEY: &str = "current";
pub const ACTIVITY_LOG_NAMESPACE: &str = "activity_log";
pub const ACTIVITY_LOG_KEY: &str = "entries";
pub const ACCOUNT_LOCK_NAMESPACE: &str = "account_lock";
pub const ACCOUNT_LOCK_KEY: &str = "browser";

// Key under which the single admin-owned time window record is cached
pub const TIME_WINDOW_KEY: &str = "timewindow";
