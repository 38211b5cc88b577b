use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Stage;
use crate::errors::CoreError;

/// One behavioral-task outcome. `results` is the task's serialized payload
/// and is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CognitiveResult {
    pub experiment: String,
    pub is_relevant: bool,
    /// Original `date_time` text from the snapshot; half of the ledger key.
    pub date_time: String,
    pub recorded_at: DateTime<Utc>,
    pub results: String,
    pub stage: Stage,
}

impl CognitiveResult {
    /// Composite ledger key: `<date_time>|<experiment>`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}|{}", self.date_time, self.experiment)
    }

    /// Split a composite key into `(date_time, experiment)`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidKey` if the key has no `|` separator.
    pub fn split_key(key: &str) -> Result<(&str, &str), CoreError> {
        key.split_once('|')
            .ok_or_else(|| CoreError::InvalidKey(key.to_string()))
    }
}
