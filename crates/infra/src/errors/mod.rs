//! Infrastructure error conversions.

mod conversions;

pub use conversions::{storage_error_from_pool, storage_error_from_sql, InfraError};
