//! Database error types for calm-db.

use calm_core::errors::CoreError;
use thiserror::Error;

/// Errors from ledger, participant, and snapshot operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid state encountered (e.g., bad data in DB, oversized batch).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A snapshot row lacks a required field.
    #[error("Malformed {table} row: missing required field '{field}'")]
    MissingField { table: &'static str, field: String },

    /// A snapshot row field has the wrong type or an invalid value.
    #[error("Malformed {table} row: field '{field}' {reason}")]
    InvalidField {
        table: &'static str,
        field: String,
        reason: String,
    },

    /// No participant record exists for the id.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// A study type failed to parse.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Stored JSON could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
