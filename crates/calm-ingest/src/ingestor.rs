//! Ingestion orchestrator: one snapshot in, ledger records out.
//!
//! ```text
//! snapshot ─► decode rows newer than the ledger cursors
//!          ─► progress transitions for the stages seen
//!          ─► time / bonus / visit rewards from the full session history
//!          ─► batched writes: earnings, sessions, cognitive results
//! ```
//!
//! Any failure aborts the run and is reported as an error outcome. The only
//! swallowed failure is batch-write backpressure that outlasts its retries.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use calm_config::CalmConfig;
use calm_core::civil::civil_day;
use calm_core::entities::Earning;
use calm_core::enums::{EarningsType, Stage};
use calm_db::cursor::latest_synced_instant;
use calm_db::retry::RetryConfig;
use calm_db::snapshot::Snapshot;
use calm_db::store::{LedgerStore, ProgressStore, SyncCategory, WriteRequest};
use calm_db::writer::{BatchWriter, WriteSummary};
use calm_earnings::bonus::{CoherenceMetric, bonus_rewards};
use calm_earnings::progress::progress_transitions;
use calm_earnings::time::{apply_daily_cap, time_rewards};
use calm_earnings::visit::{Visit, visit_reward};
use calm_earnings::{EarningsRules, latest_instant};
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::error::IngestError;
use crate::event::S3Event;
use crate::outcome::IngestOutcome;
use crate::source::SnapshotSource;

const SNAPSHOT_FILE: &str = "snapshot.db";

/// What one successful run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub participant_id: String,
    pub sessions: usize,
    pub cognitive_results: usize,
    pub earnings: Vec<Earning>,
    pub progress_updates: usize,
    pub write: WriteSummary,
}

/// Wires the stores and calculators together for ingestion runs.
pub struct Ingestor<'a, L, P> {
    ledger: &'a L,
    progress: &'a P,
    rules: EarningsRules,
    retry: RetryConfig,
    scratch_root: Option<PathBuf>,
    clock: fn() -> DateTime<Utc>,
}

impl<'a, L: LedgerStore, P: ProgressStore> Ingestor<'a, L, P> {
    /// # Errors
    ///
    /// Returns `IngestError::Earnings` if the earnings configuration is invalid.
    pub fn new(ledger: &'a L, progress: &'a P, config: &CalmConfig) -> Result<Self, IngestError> {
        Ok(Self {
            ledger,
            progress,
            rules: EarningsRules::new(config.earnings.clone())?,
            retry: RetryConfig::from(&config.retry),
            scratch_root: None,
            clock: Utc::now,
        })
    }

    /// Replace the wall clock used for completion-date stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Download snapshots under `root` instead of the system temp directory.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Handle one trigger event end to end. The downloaded snapshot lives in
    /// a temporary directory that is removed however the run ends.
    pub async fn handle_event<S: SnapshotSource>(&self, event: &S3Event, source: &S) -> IngestOutcome {
        Self::outcome(self.ingest_event(event, source).await)
    }

    /// Handle a snapshot that is already on local disk.
    pub async fn handle_file(&self, participant_id: &str, path: &Path) -> IngestOutcome {
        Self::outcome(self.ingest(participant_id, path).await)
    }

    fn outcome(result: Result<IngestReport, IngestError>) -> IngestOutcome {
        match result {
            Ok(_) => IngestOutcome::Success,
            Err(e) => {
                error!(error = %e, "ingestion failed");
                IngestOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn ingest_event<S: SnapshotSource>(
        &self,
        event: &S3Event,
        source: &S,
    ) -> Result<IngestReport, IngestError> {
        let location = event.snapshot_location()?;
        info!(
            participant_id = %location.participant_id,
            bucket = %location.bucket,
            key = %location.key,
            "snapshot received"
        );
        let mut scratch = tempfile::Builder::new();
        scratch.prefix("calm-snapshot-");
        let dir = match &self.scratch_root {
            Some(root) => scratch.tempdir_in(root)?,
            None => scratch.tempdir()?,
        };
        let path = dir.path().join(SNAPSHOT_FILE);
        source.fetch(&location.key, &path).await?;
        self.ingest(&location.participant_id, &path).await
    }

    /// Ingest one participant snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first failure from decoding, the stores, or the
    /// calculators.
    pub async fn ingest(&self, participant_id: &str, path: &Path) -> Result<IngestReport, IngestError> {
        let tz = self.rules.tz();
        let snapshot = Snapshot::open(path, self.rules.config().daily_training_minutes).await?;

        let cognitive_cursor =
            latest_synced_instant(self.ledger, participant_id, SyncCategory::CognitiveResults).await?;
        let cognitive_results = snapshot.cognitive_results_after(cognitive_cursor).await?;

        let session_cursor =
            latest_synced_instant(self.ledger, participant_id, SyncCategory::Sessions).await?;
        let new_sessions = snapshot.sessions_after(session_cursor).await?;
        let all_sessions = snapshot.all_sessions().await?;

        let participant = self.progress.get_participant(participant_id).await?;
        let prior = self.ledger.earnings_for_participant(participant_id).await?;

        let stages: BTreeSet<Stage> = new_sessions.iter().map(|s| s.stage).collect();
        let today = civil_day((self.clock)(), tz);
        let updates = progress_transitions(&participant.progress, &stages, today);
        for update in &updates {
            let progress = self.progress.update_progress(participant_id, update).await?;
            info!(participant_id, status = ?progress.status, "progress updated");
        }

        let rewards = time_rewards(&all_sessions, latest_instant(&prior, EarningsType::PerHour));
        let mut earnings = apply_daily_cap(&rewards, &prior, &self.rules);

        if stages.contains(&Stage::Training) {
            let metric = CoherenceMetric::for_participant(&participant)?;
            let last_bonus = latest_instant(&prior, EarningsType::Bonus);
            for reward in bonus_rewards(&all_sessions, last_bonus, metric, &self.rules) {
                earnings.push(self.rules.price(reward)?);
            }
        }

        for visit in [Visit::One, Visit::Two] {
            let already_paid = prior.iter().any(|e| e.earnings_type == visit.earnings_type());
            if !stages.contains(&visit.stage()) || already_paid {
                continue;
            }
            if let Some(reward) = visit_reward(&all_sessions, visit) {
                earnings.push(self.rules.price(reward)?);
            }
        }

        info!(
            participant_id,
            earnings = earnings.len(),
            sessions = new_sessions.len(),
            cognitive_results = cognitive_results.len(),
            "about to save records"
        );

        let mut requests =
            Vec::with_capacity(earnings.len() + new_sessions.len() + cognitive_results.len());
        requests.extend(earnings.iter().map(|e| WriteRequest::Earning {
            participant_id: participant_id.to_string(),
            date_type: e.key().render(tz),
            amount: e.amount,
        }));
        let session_count = new_sessions.len();
        requests.extend(new_sessions.into_iter().map(|session| WriteRequest::Session {
            participant_id: participant_id.to_string(),
            session,
        }));
        let cognitive_count = cognitive_results.len();
        requests.extend(cognitive_results.into_iter().map(|result| {
            WriteRequest::CognitiveResult {
                participant_id: participant_id.to_string(),
                result,
            }
        }));

        let writer = BatchWriter::new(self.ledger, self.retry.clone());
        let write = writer.write_all(requests).await?;
        info!(participant_id, written = write.written(), "finished saving records");

        Ok(IngestReport {
            participant_id: participant_id.to_string(),
            sessions: session_count,
            cognitive_results: cognitive_count,
            earnings,
            progress_updates: updates.len(),
            write,
        })
    }
}
