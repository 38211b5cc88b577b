//! libSQL implementation of [`LedgerStore`].
//!
//! Every ledger table is keyed `(participant_id, <ordering key>)` and every
//! put is an `INSERT OR REPLACE`, so re-deriving a record overwrites it.

use calm_core::entities::{Earning, EarningKey, Session};

use crate::CalmDb;
use crate::error::DatabaseError;
use crate::retry::is_transient_error;
use crate::store::{LedgerKey, LedgerStore, SyncCategory, WriteRequest};

impl LedgerStore for CalmDb {
    async fn latest_key(
        &self,
        participant_id: &str,
        category: SyncCategory,
    ) -> Result<Option<LedgerKey>, DatabaseError> {
        let sql = match category {
            SyncCategory::Sessions => {
                "SELECT start_date_time FROM ledger_sessions WHERE participant_id = ?1 \
                 ORDER BY start_date_time DESC LIMIT 1"
            }
            SyncCategory::CognitiveResults => {
                "SELECT date_time_experiment FROM ledger_cognitive_results \
                 WHERE participant_id = ?1 ORDER BY date_time_experiment DESC LIMIT 1"
            }
        };
        let mut rows = self.conn().query(sql, [participant_id]).await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let key = match category {
            SyncCategory::Sessions => LedgerKey::Instant(row.get::<i64>(0)?),
            SyncCategory::CognitiveResults => LedgerKey::Text(row.get::<String>(0)?),
        };
        Ok(Some(key))
    }

    async fn earnings_for_participant(
        &self,
        participant_id: &str,
    ) -> Result<Vec<Earning>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT date_type, amount FROM ledger_earnings WHERE participant_id = ?1",
                [participant_id],
            )
            .await?;

        let mut earnings = Vec::new();
        while let Some(row) = rows.next().await? {
            let date_type = row.get::<String>(0)?;
            let key = EarningKey::parse(&date_type)?;
            earnings.push(Earning {
                instant: key.instant,
                earnings_type: key.earnings_type,
                amount: row.get::<f64>(1)?,
            });
        }
        // Keys carry a zone offset, so text order is not time order.
        earnings.sort_by_key(|e| (e.instant, e.earnings_type.as_str()));
        Ok(earnings)
    }

    fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    async fn batch_write(
        &self,
        requests: &[WriteRequest],
    ) -> Result<Vec<WriteRequest>, DatabaseError> {
        if requests.len() > self.batch_limit() {
            return Err(DatabaseError::InvalidState(format!(
                "batch of {} items exceeds the limit of {}",
                requests.len(),
                self.batch_limit()
            )));
        }

        let mut unprocessed = Vec::new();
        for request in requests {
            match self.put(request).await {
                Ok(()) => {}
                Err(e) if is_transient_error(&e) => {
                    tracing::debug!(table = request.table(), error = %e, "put deferred");
                    unprocessed.push(request.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(unprocessed)
    }
}

impl CalmDb {
    async fn put(&self, request: &WriteRequest) -> Result<(), libsql::Error> {
        match request {
            WriteRequest::Session {
                participant_id,
                session,
            } => self.put_session(participant_id, session).await,
            WriteRequest::CognitiveResult {
                participant_id,
                result,
            } => {
                self.conn()
                    .execute(
                        "INSERT OR REPLACE INTO ledger_cognitive_results \
                         (participant_id, date_time_experiment, is_relevant, results, stage) \
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        libsql::params![
                            participant_id.as_str(),
                            result.key(),
                            i64::from(result.is_relevant),
                            result.results.as_str(),
                            result.stage.as_i64()
                        ],
                    )
                    .await?;
                Ok(())
            }
            WriteRequest::Earning {
                participant_id,
                date_type,
                amount,
            } => {
                self.conn()
                    .execute(
                        "INSERT OR REPLACE INTO ledger_earnings (participant_id, date_type, amount) \
                         VALUES (?1, ?2, ?3)",
                        libsql::params![participant_id.as_str(), date_type.as_str(), *amount],
                    )
                    .await?;
                Ok(())
            }
        }
    }

    async fn put_session(&self, participant_id: &str, session: &Session) -> Result<(), libsql::Error> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO ledger_sessions \
                 (participant_id, start_date_time, emwave_session_id, duration_seconds, \
                  avg_coherence, weighted_avg_coherence, weighted_inverse_coherence, \
                  valid_status, stage, emo_pic_name) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params![
                    participant_id,
                    session.start_secs(),
                    session.emwave_session_id.as_str(),
                    session.duration_seconds,
                    session.avg_coherence,
                    session.weighted_avg_coherence,
                    session.weighted_inverse_coherence,
                    session.valid_status,
                    session.stage.as_i64(),
                    session.emo_pic_name.as_deref()
                ],
            )
            .await?;
        Ok(())
    }
}
