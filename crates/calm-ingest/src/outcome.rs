//! Status payload returned for each trigger event.

use serde::{Deserialize, Serialize};

/// `{"status":"success"}` or `{"status":"error","message":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestOutcome {
    Success,
    Error { message: String },
}

impl IngestOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        assert_eq!(
            serde_json::to_string(&IngestOutcome::Success).unwrap(),
            r#"{"status":"success"}"#
        );
        assert_eq!(
            serde_json::to_string(&IngestOutcome::Error {
                message: "boom".into()
            })
            .unwrap(),
            r#"{"status":"error","message":"boom"}"#
        );
    }
}
