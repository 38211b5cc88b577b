//! Read-only access to an uploaded participant snapshot.
//!
//! A snapshot is an embedded libSQL/SQLite file produced by the desktop
//! client. It holds the participant's full history, so the ingestion run
//! reads both "new since cursor" slices and the complete session set.

mod decode;

use std::path::Path;

use chrono::{DateTime, Utc};
use libsql::{Builder, OpenFlags};

use calm_core::entities::{CognitiveResult, Session};

use crate::error::DatabaseError;

pub use decode::{
    RawRow, canonical_field_name, cognitive_recorded_at, decode_cognitive_result, decode_session,
};
use decode::{COGNITIVE_TABLE, SESSIONS_TABLE};

pub struct Snapshot {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    max_session_minutes: u32,
}

impl Snapshot {
    /// Open a snapshot file read-only.
    ///
    /// `max_session_minutes` caps the weight used when a session row lacks
    /// its inverse coherence score and it has to be derived.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the file cannot be opened.
    pub async fn open(path: &Path, max_session_minutes: u32) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path)
            .flags(OpenFlags::SQLITE_OPEN_READ_ONLY)
            .build()
            .await?;
        let conn = db.connect()?;
        Ok(Self {
            db,
            conn,
            max_session_minutes,
        })
    }

    /// Sessions that started strictly after `cursor`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure or a malformed row.
    pub async fn sessions_after(&self, cursor: DateTime<Utc>) -> Result<Vec<Session>, DatabaseError> {
        self.query_sessions(
            "SELECT * FROM emwave_sessions WHERE pulse_start_time > ?1 ORDER BY pulse_start_time",
            libsql::params![cursor.timestamp()],
        )
        .await
    }

    /// Every session in the snapshot, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure or a malformed row.
    pub async fn all_sessions(&self) -> Result<Vec<Session>, DatabaseError> {
        self.query_sessions(
            "SELECT * FROM emwave_sessions ORDER BY pulse_start_time",
            (),
        )
        .await
    }

    /// Cognitive results recorded strictly after `cursor`, oldest first.
    ///
    /// `date_time` is free-form text in the snapshot, so the comparison runs
    /// on parsed instants rather than in SQL. Rows at or before the cursor are
    /// only decoded as far as their `date_time`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure, a row with an unreadable
    /// `date_time`, or a malformed row newer than the cursor.
    pub async fn cognitive_results_after(
        &self,
        cursor: DateTime<Utc>,
    ) -> Result<Vec<CognitiveResult>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT experiment, is_relevant, date_time, results, stage FROM cognitive_results",
                (),
            )
            .await?;
        let columns = column_names(&rows);

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw = RawRow::from_row(COGNITIVE_TABLE, &columns, &row)?;
            let (_, recorded_at) = cognitive_recorded_at(&raw)?;
            if recorded_at > cursor {
                results.push(decode_cognitive_result(&raw)?);
            }
        }
        results.sort_by_key(|r| r.recorded_at);
        Ok(results)
    }

    async fn query_sessions(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<Session>, DatabaseError> {
        let mut rows = self.conn.query(sql, params).await?;
        let columns = column_names(&rows);

        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw = RawRow::from_row(SESSIONS_TABLE, &columns, &row)?;
            sessions.push(decode_session(&raw, self.max_session_minutes)?);
        }
        Ok(sessions)
    }
}

fn column_names(rows: &libsql::Rows) -> Vec<String> {
    (0..rows.column_count())
        .map(|i| rows.column_name(i).unwrap_or_default().to_string())
        .collect()
}
