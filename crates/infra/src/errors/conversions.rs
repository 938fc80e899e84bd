//! Conversions from external infrastructure errors into domain errors.

use appraisal_core::storage::StorageError;
use appraisal_domain::AppraisalError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AppraisalError);

impl From<InfraError> for AppraisalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AppraisalError> for InfraError {
    fn from(value: AppraisalError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAppraisalError {
    fn into_appraisal(self) -> AppraisalError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AppraisalError */
/* -------------------------------------------------------------------------- */

impl IntoAppraisalError for SqlError {
    fn into_appraisal(self) -> AppraisalError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => AppraisalError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        AppraisalError::Storage("database is locked".into())
                    }
                    ErrorCode::DiskFull => {
                        AppraisalError::Storage(format!("storage quota exceeded: {message}"))
                    }
                    ErrorCode::ReadOnly => {
                        AppraisalError::Storage("database is read-only".into())
                    }
                    _ => AppraisalError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                AppraisalError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                AppraisalError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                AppraisalError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => AppraisalError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => AppraisalError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_appraisal())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → AppraisalError */
/* -------------------------------------------------------------------------- */

impl IntoAppraisalError for r2d2::Error {
    fn into_appraisal(self) -> AppraisalError {
        AppraisalError::Storage(format!("connection pool unavailable: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_appraisal())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AppraisalError */
/* -------------------------------------------------------------------------- */

impl IntoAppraisalError for HttpError {
    fn into_appraisal(self) -> AppraisalError {
        if self.is_timeout() {
            return AppraisalError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AppraisalError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return AppraisalError::Config(format!("invalid HTTP client setup: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => AppraisalError::Auth(message),
                404 => AppraisalError::NotFound(message),
                _ => AppraisalError::Network(message),
            };
        }

        AppraisalError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_appraisal())
    }
}

/* -------------------------------------------------------------------------- */
/* Store-port errors */
/* -------------------------------------------------------------------------- */

/// Map a SQLite failure onto the key/value store port. A full database
/// (`SQLITE_FULL`, raised once `max_page_count` is reached) is a quota error.
pub fn storage_error_from_sql(err: SqlError) -> StorageError {
    if err.sqlite_error_code() == Some(rusqlite::ErrorCode::DiskFull) {
        return StorageError::QuotaExceeded(err.to_string());
    }
    StorageError::Backend(AppraisalError::from(InfraError::from(err)).to_string())
}

pub fn storage_error_from_pool(err: r2d2::Error) -> StorageError {
    StorageError::Backend(AppraisalError::from(InfraError::from(err)).to_string())
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
