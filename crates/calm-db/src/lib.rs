//! # calm-db
//!
//! libSQL-backed storage for the CALM ingestion engine.
//!
//! - [`store`]: the ledger and participant-progress store interfaces the
//!   orchestrator depends on, and the write requests they accept
//! - [`ledger`] / [`participants`]: their libSQL implementation on [`CalmDb`]
//! - [`snapshot`]: read-only access to an uploaded embedded database and the
//!   row decoder that turns its rows into typed records
//! - [`cursor`]: latest-synced-instant lookups per participant and category
//! - [`writer`]: chunked batch writes with retry of unprocessed items

pub mod cursor;
pub mod error;
pub mod helpers;
pub mod ledger;
mod migrations;
pub mod participants;
pub mod retry;
pub mod snapshot;
pub mod store;
pub mod writer;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Default per-request item limit of [`store::LedgerStore::batch_write`].
pub const DEFAULT_BATCH_LIMIT: usize = 25;

/// Central ledger handle: sessions, earnings, cognitive results, and
/// participant progress.
pub struct CalmDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    batch_limit: usize,
}

impl CalmDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let calm_db = Self {
            db,
            conn,
            batch_limit: DEFAULT_BATCH_LIMIT,
        };
        calm_db.run_migrations().await?;
        Ok(calm_db)
    }

    /// Override the per-request item limit enforced by batched writes.
    /// A zero limit is raised to 1.
    #[must_use]
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit.max(1);
        self
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
