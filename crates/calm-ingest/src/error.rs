//! Ingestion error types.

use calm_config::ConfigError;
use calm_db::error::DatabaseError;
use calm_earnings::EarningsError;
use thiserror::Error;

/// Anything that makes an ingestion run fail. The orchestrator reports all of
/// these as `{status: "error"}`.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The trigger event could not be interpreted.
    #[error("Invalid trigger event: {0}")]
    InvalidEvent(String),

    /// The snapshot could not be downloaded.
    #[error("Snapshot download failed: {0}")]
    Download(#[from] object_store::Error),

    /// Local file handling around the snapshot failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Earnings(#[from] EarningsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
