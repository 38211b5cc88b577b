//! Ledger store configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_db_path() -> String {
    String::from("calm-ledger.db")
}

/// Per-request item limit of the ledger's batched write call.
const fn default_batch_limit() -> usize {
    25
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// libSQL database path, or `":memory:"`.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Maximum number of items submitted in one batched write.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            batch_limit: default_batch_limit(),
        }
    }
}

impl LedgerConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero `batch_limit`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ledger.batch_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
