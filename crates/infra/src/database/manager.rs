//! SQLite connection manager for the durable key/value store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use appraisal_domain::{AppraisalError, Result, StorageConfig};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use tracing::{info, instrument};

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pages reserved for the schema regardless of the configured quota.
const MIN_PAGES: u64 = 4;

pub type SqlitePool = Pool<SqliteConnectionManager>;
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// Owns the r2d2 pool and applies per-connection pragmas, including the
/// page cap that enforces the storage quota.
pub struct DbManager {
    pool: SqlitePool,
    path: PathBuf,
    max_pages: Option<u64>,
}

impl DbManager {
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref().display()))]
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32, quota_bytes: Option<u64>) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let max_pages = quota_bytes.map(pages_for_quota);

        let manager = SqliteConnectionManager::file(&path)
            .with_init(move |conn| configure_connection(conn, max_pages));

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)
            .map_err(|err| AppraisalError::from(InfraError::from(err)))?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            max_pages = ?max_pages,
            "sqlite pool initialised"
        );

        Ok(Self { pool, path, max_pages })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size, config.quota_bytes)
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> std::result::Result<SqliteConnection, r2d2::Error> {
        self.pool.get()
    }

    /// Ensure the schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection().map_err(|err| AppraisalError::from(InfraError::from(err)))?;
        create_schema(&conn)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_pages(&self) -> Option<u64> {
        self.max_pages
    }

    /// Verify the database answers a trivial query.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection().map_err(|err| AppraisalError::from(InfraError::from(err)))?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

impl std::fmt::Debug for DbManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbManager")
            .field("path", &self.path)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

fn configure_connection(conn: &mut Connection, max_pages: Option<u64>) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    if let Some(pages) = max_pages {
        let pages = i64::try_from(pages).unwrap_or(i64::MAX);
        conn.pragma_update_and_check(None, "max_page_count", pages, |row| {
            row.get::<_, i64>(0)
        })?;
    }
    Ok(())
}

fn pages_for_quota(quota_bytes: u64) -> u64 {
    // Default SQLite page size.
    const PAGE_SIZE: u64 = 4096;
    (quota_bytes / PAGE_SIZE).max(MIN_PAGES)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> AppraisalError {
    AppraisalError::from(InfraError::from(err))
}
