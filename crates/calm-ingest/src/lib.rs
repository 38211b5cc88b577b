//! # calm-ingest
//!
//! Entry point of the CALM earnings engine. Each uploaded participant
//! snapshot triggers one [`Ingestor`] run that decodes unsynced rows,
//! advances study progress, computes earnings, and writes everything to the
//! ledger.

pub mod error;
pub mod event;
pub mod ingestor;
pub mod outcome;
pub mod source;

pub use error::IngestError;
pub use event::{S3Event, SnapshotLocation};
pub use ingestor::{IngestReport, Ingestor};
pub use outcome::IngestOutcome;
pub use source::{ObjectStoreSource, SnapshotSource};
