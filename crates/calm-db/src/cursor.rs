//! Cursor tracking: the newest already-persisted instant per participant
//! and record category.
//!
//! The cursor is never stored on its own. It is recomputed each run from the
//! ledger, which makes a re-run after a partial failure pick up exactly the
//! records that did not land.

use chrono::{DateTime, Utc};

use calm_core::civil::{EPOCH, instant_from_unix};
use calm_core::entities::CognitiveResult;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::store::{LedgerKey, LedgerStore, SyncCategory};

/// Latest synced instant for `category`, or [`EPOCH`] when nothing has been
/// persisted yet.
///
/// # Errors
///
/// Returns `DatabaseError` if the lookup fails or the stored key cannot be
/// interpreted as an instant.
pub async fn latest_synced_instant<L: LedgerStore>(
    ledger: &L,
    participant_id: &str,
    category: SyncCategory,
) -> Result<DateTime<Utc>, DatabaseError> {
    let Some(key) = ledger.latest_key(participant_id, category).await? else {
        return Ok(EPOCH);
    };
    let instant = match key {
        LedgerKey::Instant(secs) => instant_from_unix(secs)?,
        LedgerKey::Text(text) => {
            let (date_time, _experiment) = CognitiveResult::split_key(&text)?;
            parse_datetime(date_time)?
        }
    };
    tracing::debug!(participant_id, category = category.as_str(), %instant, "cursor");
    Ok(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::WriteRequest;
    use crate::test_support::{cognitive_result, in_memory_db, session};

    #[tokio::test]
    async fn empty_ledger_starts_at_epoch() {
        let db = in_memory_db().await;
        for category in [SyncCategory::Sessions, SyncCategory::CognitiveResults] {
            assert_eq!(
                latest_synced_instant(&db, "abc345", category).await.unwrap(),
                EPOCH
            );
        }
    }

    #[tokio::test]
    async fn session_cursor_is_latest_start() {
        let db = in_memory_db().await;
        db.batch_write(&[
            WriteRequest::Session {
                participant_id: "abc345".into(),
                session: session(1_710_000_000, 900, 3),
            },
            WriteRequest::Session {
                participant_id: "abc345".into(),
                session: session(1_710_050_000, 900, 3),
            },
        ])
        .await
        .unwrap();

        let cursor = latest_synced_instant(&db, "abc345", SyncCategory::Sessions)
            .await
            .unwrap();
        assert_eq!(cursor.timestamp(), 1_710_050_000);
    }

    #[tokio::test]
    async fn cognitive_cursor_is_date_half_of_key() {
        let db = in_memory_db().await;
        db.batch_write(&[WriteRequest::CognitiveResult {
            participant_id: "abc345".into(),
            result: cognitive_result("2024-10-10T11:11:12.000Z", "flanker-1"),
        }])
        .await
        .unwrap();

        let cursor = latest_synced_instant(&db, "abc345", SyncCategory::CognitiveResults)
            .await
            .unwrap();
        assert_eq!(cursor.to_rfc3339(), "2024-10-10T11:11:12+00:00");
    }
}
