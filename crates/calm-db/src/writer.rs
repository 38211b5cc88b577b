//! Durable batch writer.
//!
//! Splits a mixed list of puts into chunks no larger than the store's
//! per-request limit and submits them one after another. Items a chunk comes
//! back with are resubmitted with exponential backoff; once the retry budget
//! is spent the remainder is logged and dropped.

use tracing::{debug, error, info, warn};

use crate::error::DatabaseError;
use crate::retry::RetryConfig;
use crate::store::{LedgerStore, WriteRequest};

/// Counters from one [`BatchWriter::write_all`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Items handed to the writer.
    pub submitted: usize,
    /// Initial batch calls (one per chunk).
    pub batches: usize,
    /// Resubmissions of unprocessed items.
    pub retries: usize,
    /// Items still unprocessed after the retry budget ran out.
    pub unprocessed: usize,
}

impl WriteSummary {
    #[must_use]
    pub const fn written(&self) -> usize {
        self.submitted - self.unprocessed
    }
}

/// Chunks are sized by the store's own [`LedgerStore::batch_limit`].
pub struct BatchWriter<'a, L> {
    ledger: &'a L,
    retry: RetryConfig,
}

impl<'a, L: LedgerStore> BatchWriter<'a, L> {
    pub const fn new(ledger: &'a L, retry: RetryConfig) -> Self {
        Self { ledger, retry }
    }

    /// Persist every request, in order, chunk by chunk.
    ///
    /// # Errors
    ///
    /// Returns the first hard store error. Chunks submitted before it stay
    /// written. Backpressure that outlasts the retry budget is not an error.
    pub async fn write_all(
        &self,
        requests: Vec<WriteRequest>,
    ) -> Result<WriteSummary, DatabaseError> {
        let mut summary = WriteSummary {
            submitted: requests.len(),
            ..WriteSummary::default()
        };
        if requests.is_empty() {
            return Ok(summary);
        }
        info!(items = requests.len(), "saving ledger records");

        // `chunks` panics on zero.
        let chunk_size = self.ledger.batch_limit().max(1);
        for chunk in requests.chunks(chunk_size) {
            summary.batches += 1;
            let mut pending = self.ledger.batch_write(chunk).await?;

            let mut attempt = 0;
            while !pending.is_empty() && attempt < self.retry.max_attempts {
                let delay = self.retry.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    remaining = pending.len(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying unprocessed items"
                );
                tokio::time::sleep(delay).await;
                pending = self.ledger.batch_write(&pending).await?;
                summary.retries += 1;
                attempt += 1;
            }

            if !pending.is_empty() {
                error!(
                    remaining = pending.len(),
                    attempts = attempt,
                    "retry budget exhausted; unprocessed items dropped"
                );
                summary.unprocessed += pending.len();
            }
        }

        debug!(?summary, "batch write finished");
        info!(items = summary.written(), "saved ledger records");
        Ok(summary)
    }
}
