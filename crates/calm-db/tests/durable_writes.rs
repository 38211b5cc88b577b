//! End-to-end writes against a file-backed ledger.

use calm_core::civil::instant_from_unix;
use calm_core::entities::{Session, WeightedScores};
use calm_core::enums::{Condition, Stage};
use calm_db::CalmDb;
use calm_db::cursor::latest_synced_instant;
use calm_db::retry::RetryConfig;
use calm_db::store::{LedgerStore, ProgressStore, SyncCategory, WriteRequest};
use calm_db::writer::BatchWriter;
use pretty_assertions::assert_eq;

fn training_session(start_secs: i64) -> Session {
    let scores = WeightedScores::derive(1.5, 18 * 60, 18);
    Session {
        emwave_session_id: format!("E-{start_secs}"),
        start: instant_from_unix(start_secs).unwrap(),
        duration_seconds: 18 * 60,
        avg_coherence: 1.5,
        weighted_avg_coherence: scores.weighted_avg_coherence,
        weighted_inverse_coherence: scores.weighted_inverse_coherence,
        valid_status: 1,
        stage: Stage::Training,
        emo_pic_name: Some("lake.jpg".into()),
    }
}

async fn count(db: &CalmDb, table: &str) -> i64 {
    let mut rows = db
        .conn()
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}

#[tokio::test]
async fn mixed_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let path = path.to_str().unwrap();

    {
        let db = CalmDb::open_local(path).await.unwrap();
        let mut requests = Vec::new();
        for i in 0..40 {
            requests.push(WriteRequest::Earning {
                participant_id: "abc345".into(),
                date_type: format!("2024-03-{:02}T09:00:00-08:00|per_hour", i % 28 + 1),
                amount: 1.0,
            });
        }
        for i in 0..20 {
            requests.push(WriteRequest::Session {
                participant_id: "abc345".into(),
                session: training_session(1_710_000_000 + i * 3600),
            });
        }

        let writer = BatchWriter::new(&db, RetryConfig::default());
        let summary = writer.write_all(requests).await.unwrap();
        assert_eq!(summary.batches, 3);
        assert_eq!(summary.unprocessed, 0);
    }

    let db = CalmDb::open_local(path).await.unwrap();
    // 40 earnings over 28 distinct keys: repeats overwrite.
    assert_eq!(count(&db, "ledger_earnings").await, 28);
    assert_eq!(count(&db, "ledger_sessions").await, 20);
    assert_eq!(db.earnings_for_participant("abc345").await.unwrap().len(), 28);

    let cursor = latest_synced_instant(&db, "abc345", SyncCategory::Sessions)
        .await
        .unwrap();
    assert_eq!(cursor.timestamp(), 1_710_000_000 + 19 * 3600);
}

#[tokio::test]
async fn participant_progress_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let path = path.to_str().unwrap();

    {
        let db = CalmDb::open_local(path).await.unwrap();
        db.register_participant("abc345", Condition::A).await.unwrap();
    }

    let db = CalmDb::open_local(path).await.unwrap();
    let participant = db.get_participant("abc345").await.unwrap();
    assert_eq!(participant.condition().unwrap(), Condition::A);
    assert_eq!(participant.progress.status, None);
}
