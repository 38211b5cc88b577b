//! Shared fixtures for calm-db unit tests.

use std::path::{Path, PathBuf};

use calm_core::civil::instant_from_unix;
use calm_core::entities::{CognitiveResult, Session, WeightedScores};
use calm_core::enums::Stage;

use crate::CalmDb;
use crate::helpers::parse_datetime;
use crate::store::WriteRequest;

pub const SNAPSHOT_SCHEMA: &str = "
CREATE TABLE emwave_sessions (
    emwave_session_id TEXT PRIMARY KEY,
    avg_coherence REAL NOT NULL,
    pulse_start_time INTEGER NOT NULL,
    valid_status INTEGER NOT NULL,
    duration_seconds INTEGER NOT NULL,
    stage INTEGER NOT NULL,
    emo_pic_name TEXT,
    weighted_avg_coherence REAL NOT NULL,
    weighted_inverse_coherence REAL
);
CREATE TABLE cognitive_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    experiment TEXT NOT NULL,
    is_relevant INTEGER NOT NULL,
    date_time TEXT NOT NULL,
    results TEXT NOT NULL,
    stage INTEGER NOT NULL
);
";

pub async fn in_memory_db() -> CalmDb {
    CalmDb::open_local(":memory:").await.unwrap()
}

/// A valid session with 2.0 raw coherence and derived weighted scores.
pub fn session(start_secs: i64, duration_seconds: i64, stage: i64) -> Session {
    let scores = WeightedScores::derive(2.0, duration_seconds, 18);
    Session {
        emwave_session_id: format!("s-{start_secs}"),
        start: instant_from_unix(start_secs).unwrap(),
        duration_seconds,
        avg_coherence: 2.0,
        weighted_avg_coherence: scores.weighted_avg_coherence,
        weighted_inverse_coherence: scores.weighted_inverse_coherence,
        valid_status: 1,
        stage: Stage::try_from(stage).unwrap(),
        emo_pic_name: None,
    }
}

pub fn cognitive_result(date_time: &str, experiment: &str) -> CognitiveResult {
    CognitiveResult {
        experiment: experiment.to_string(),
        is_relevant: true,
        date_time: date_time.to_string(),
        recorded_at: parse_datetime(date_time).unwrap(),
        results: "{}".to_string(),
        stage: Stage::VisitOne,
    }
}

pub fn earning_request(participant_id: &str, date_type: &str, amount: f64) -> WriteRequest {
    WriteRequest::Earning {
        participant_id: participant_id.to_string(),
        date_type: date_type.to_string(),
        amount,
    }
}

/// A raw `emwave_sessions` row as the desktop client writes it.
pub struct SnapshotRow {
    id: &'static str,
    start: i64,
    duration: i64,
    stage: i64,
}

impl SnapshotRow {
    pub const fn session(id: &'static str, start: i64, duration: i64, stage: i64) -> Self {
        Self {
            id,
            start,
            duration,
            stage,
        }
    }
}

/// Write a snapshot file with the given session rows and
/// `(date_time, experiment)` cognitive rows.
pub async fn write_snapshot(
    dir: &Path,
    sessions: &[SnapshotRow],
    cognitive: &[(&str, &str)],
) -> PathBuf {
    let path = dir.join("snapshot.db");
    let db = libsql::Builder::new_local(&path).build().await.unwrap();
    let conn = db.connect().unwrap();
    conn.execute_batch(SNAPSHOT_SCHEMA).await.unwrap();

    for row in sessions {
        let scores = WeightedScores::derive(2.0, row.duration, 18);
        conn.execute(
            "INSERT INTO emwave_sessions VALUES (?1, 2.0, ?2, 1, ?3, ?4, NULL, ?5, ?6)",
            libsql::params![
                row.id,
                row.start,
                row.duration,
                row.stage,
                scores.weighted_avg_coherence,
                scores.weighted_inverse_coherence
            ],
        )
        .await
        .unwrap();
    }
    for (date_time, experiment) in cognitive {
        conn.execute(
            "INSERT INTO cognitive_results (experiment, is_relevant, date_time, results, stage) \
             VALUES (?1, 1, ?2, '{}', 1)",
            libsql::params![*experiment, *date_time],
        )
        .await
        .unwrap();
    }
    path
}
