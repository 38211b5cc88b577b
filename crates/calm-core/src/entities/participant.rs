use serde::{Deserialize, Serialize};

use crate::enums::{Condition, ProgressStatus};
use crate::errors::CoreError;

/// Mutable study progress attached to a participant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// `None` means active with no stage completed yet.
    pub status: Option<ProgressStatus>,
    /// `YYYYMMDD` in the reference zone.
    pub stage1_completed_on: Option<String>,
    pub stage2_completed_on: Option<String>,
}

/// Fields to merge into stored progress. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub status: ProgressStatus,
    pub stage1_completed_on: Option<String>,
    pub stage2_completed_on: Option<String>,
}

impl Progress {
    /// Merge an update into this progress, keeping markers it does not set.
    pub fn merge(&mut self, update: &ProgressUpdate) {
        self.status = Some(update.status);
        if let Some(day) = &update.stage1_completed_on {
            self.stage1_completed_on = Some(day.clone());
        }
        if let Some(day) = &update.stage2_completed_on {
            self.stage2_completed_on = Some(day.clone());
        }
    }
}

/// A study participant as seen by the ingestion engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub participant_id: String,
    /// Raw assigned condition; parsed on demand so unknown values fail loudly.
    pub condition: Option<String>,
    pub progress: Progress,
}

impl Participant {
    /// Parse the assigned experimental condition.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownCondition` if no condition is assigned or
    /// the assigned value is not recognized.
    pub fn condition(&self) -> Result<Condition, CoreError> {
        self.condition
            .as_deref()
            .ok_or_else(|| CoreError::UnknownCondition("<unassigned>".into()))?
            .parse()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn merge_keeps_existing_markers() {
        let mut progress = Progress {
            status: Some(ProgressStatus::Stage1Complete),
            stage1_completed_on: Some("20240301".into()),
            stage2_completed_on: None,
        };
        progress.merge(&ProgressUpdate {
            status: ProgressStatus::Stage2Complete,
            stage1_completed_on: None,
            stage2_completed_on: Some("20240320".into()),
        });
        assert_eq!(progress.status, Some(ProgressStatus::Stage2Complete));
        assert_eq!(progress.stage1_completed_on.as_deref(), Some("20240301"));
        assert_eq!(progress.stage2_completed_on.as_deref(), Some("20240320"));
    }

    #[test]
    fn missing_condition_is_unknown() {
        let participant = Participant {
            participant_id: "abc345".into(),
            condition: None,
            progress: Progress::default(),
        };
        assert!(matches!(
            participant.condition(),
            Err(CoreError::UnknownCondition(_))
        ));
    }
}
