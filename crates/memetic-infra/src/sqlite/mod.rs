//! SQLite persistence layer.
//!
//! Raw sqlx queries with private Row structs mapping SQLite rows to domain
//! types, on a split reader/writer pool in WAL mode.

pub mod catalog;
pub mod history;
pub mod pool;

use chrono::{DateTime, Utc};
use memetic_types::error::RepositoryError;

/// Map a sqlx error to the domain error taxonomy.
///
/// Connection-level failures become `Unavailable` so callers can tell
/// "store unreachable" apart from a bad query.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Tls(_) => RepositoryError::Unavailable,
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Query(other.to_string()),
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
