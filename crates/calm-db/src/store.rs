//! Store interfaces the ingestion orchestrator is written against.
//!
//! [`CalmDb`](crate::CalmDb) implements both traits over libSQL. Tests and
//! alternative backends supply their own implementations.

use calm_core::entities::{CognitiveResult, Earning, Participant, Progress, ProgressUpdate, Session};

use crate::error::DatabaseError;

/// Record categories that carry a sync cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncCategory {
    Sessions,
    CognitiveResults,
}

impl SyncCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::CognitiveResults => "cognitive_results",
        }
    }
}

/// Sort key of a ledger record, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerKey {
    /// Seconds since the epoch (sessions).
    Instant(i64),
    /// Composite text key (cognitive results, earnings).
    Text(String),
}

/// One put into a ledger table. Puts overwrite a record with the same key.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    Session {
        participant_id: String,
        session: Session,
    },
    CognitiveResult {
        participant_id: String,
        result: CognitiveResult,
    },
    Earning {
        participant_id: String,
        /// Rendered [`EarningKey`](calm_core::entities::EarningKey).
        date_type: String,
        amount: f64,
    },
}

impl WriteRequest {
    #[must_use]
    pub fn participant_id(&self) -> &str {
        match self {
            Self::Session { participant_id, .. }
            | Self::CognitiveResult { participant_id, .. }
            | Self::Earning { participant_id, .. } => participant_id,
        }
    }

    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Session { .. } => "ledger_sessions",
            Self::CognitiveResult { .. } => "ledger_cognitive_results",
            Self::Earning { .. } => "ledger_earnings",
        }
    }
}

/// Central ledger of sessions, earnings, and cognitive results.
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Largest sort key in `category` for the participant (descending scan,
    /// limit 1), or `None` if the participant has no records yet.
    async fn latest_key(
        &self,
        participant_id: &str,
        category: SyncCategory,
    ) -> Result<Option<LedgerKey>, DatabaseError>;

    /// All earnings previously granted to the participant, oldest first.
    async fn earnings_for_participant(
        &self,
        participant_id: &str,
    ) -> Result<Vec<Earning>, DatabaseError>;

    /// Largest number of puts one [`batch_write`](Self::batch_write) call
    /// accepts.
    fn batch_limit(&self) -> usize;

    /// Submit one batch of puts. Returns the requests the store did not
    /// process (backpressure); those may be resubmitted as-is.
    ///
    /// Fails outright when the batch exceeds the store's item limit or a put
    /// hits a non-transient error.
    async fn batch_write(
        &self,
        requests: &[WriteRequest],
    ) -> Result<Vec<WriteRequest>, DatabaseError>;
}

/// Participant records with their condition and study progress.
#[allow(async_fn_in_trait)]
pub trait ProgressStore {
    /// # Errors
    ///
    /// Returns `DatabaseError::ParticipantNotFound` for unknown ids.
    async fn get_participant(&self, participant_id: &str) -> Result<Participant, DatabaseError>;

    /// Read stored progress, merge `update` into it, and write it back.
    async fn update_progress(
        &self,
        participant_id: &str,
        update: &ProgressUpdate,
    ) -> Result<Progress, DatabaseError>;
}
