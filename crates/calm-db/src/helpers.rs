//! Row parsing helpers shared by the ledger and snapshot readers.
//!
//! Snapshot `date_time` columns are written by the desktop client as
//! RFC 3339 (`"2024-10-10T11:11:12.000Z"`), while `SQLite`'s own
//! `datetime('now')` produces `"2024-10-10 11:11:12"`; both are accepted.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Human-readable `SQLite` storage class, for error messages.
#[must_use]
pub const fn value_kind(value: &libsql::Value) -> &'static str {
    match value {
        libsql::Value::Null => "null",
        libsql::Value::Integer(_) => "integer",
        libsql::Value::Real(_) => "real",
        libsql::Value::Text(_) => "text",
        libsql::Value::Blob(_) => "blob",
    }
}
