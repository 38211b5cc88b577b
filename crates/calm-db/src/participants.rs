//! libSQL implementation of [`ProgressStore`].
//!
//! Progress is stored as a JSON document in `participants.progress`; updates
//! read it, merge the new fields in, and write the whole document back.

use calm_core::entities::{Participant, Progress, ProgressUpdate};
use calm_core::enums::Condition;

use crate::CalmDb;
use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::store::ProgressStore;

impl CalmDb {
    /// Create (or reset) a participant record with empty progress.
    ///
    /// Registration proper happens outside the ingestion engine; this exists
    /// for tooling and tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn register_participant(
        &self,
        participant_id: &str,
        condition: Condition,
    ) -> Result<Participant, DatabaseError> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO participants (participant_id, condition, progress, updated_at) \
                 VALUES (?1, ?2, '{}', datetime('now'))",
                libsql::params![participant_id, condition.as_str()],
            )
            .await?;
        Ok(Participant {
            participant_id: participant_id.to_string(),
            condition: Some(condition.as_str().to_string()),
            progress: Progress::default(),
        })
    }
}

fn decode_progress(participant_id: &str, raw: &str) -> Result<Progress, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| {
        DatabaseError::InvalidState(format!(
            "participant {participant_id} has unreadable progress: {e}"
        ))
    })
}

impl ProgressStore for CalmDb {
    async fn get_participant(&self, participant_id: &str) -> Result<Participant, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT participant_id, condition, progress FROM participants WHERE participant_id = ?1",
                [participant_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::ParticipantNotFound(participant_id.to_string()))?;

        Ok(Participant {
            participant_id: row.get(0)?,
            condition: get_opt_string(&row, 1)?,
            progress: decode_progress(participant_id, &row.get::<String>(2)?)?,
        })
    }

    async fn update_progress(
        &self,
        participant_id: &str,
        update: &ProgressUpdate,
    ) -> Result<Progress, DatabaseError> {
        let mut progress = self.get_participant(participant_id).await?.progress;
        progress.merge(update);

        let json = serde_json::to_string(&progress)?;
        self.conn()
            .execute(
                "UPDATE participants SET progress = ?1, updated_at = datetime('now') \
                 WHERE participant_id = ?2",
                libsql::params![json, participant_id],
            )
            .await?;
        Ok(progress)
    }
}
