//! Cross-cutting error types for CALM.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `IngestError`) are defined
//! in their respective crates and wrap `CoreError` where study types are
//! parsed or validated.

use thiserror::Error;

/// Errors that can be raised by any CALM crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A lifecycle stage outside 1..=4.
    #[error("Invalid lifecycle stage: {0}")]
    InvalidStage(i64),

    /// An experimental condition with no metric selector.
    #[error("Unrecognized experimental condition '{0}'")]
    UnknownCondition(String),

    /// An earnings type string that does not name a known reward.
    #[error("Unrecognized earnings type '{0}'")]
    InvalidEarningsType(String),

    /// A composite ledger key that could not be split or parsed.
    #[error("Invalid ledger key '{0}'")]
    InvalidKey(String),
}
