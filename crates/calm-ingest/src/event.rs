//! Object-created notifications that trigger an ingestion run.
//!
//! The payload follows the S3 event notification shape; only the fields the
//! engine reads are modeled.
//!
//! ```json
//! {"Records": [{"s3": {"bucket": {"name": "calm-snapshots"},
//!                      "object": {"key": "abc345/2024-03-09/calm.sqlite"}}}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Object {
    /// URL-encoded object key.
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Where a snapshot lives and whose it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLocation {
    pub bucket: String,
    /// Decoded object key.
    pub key: String,
    pub participant_id: String,
}

impl SnapshotLocation {
    /// Locate a snapshot from a raw (URL-encoded) object key. The participant
    /// id is the key's first path segment.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::InvalidEvent` if the key does not decode or has
    /// no participant segment.
    pub fn from_key(bucket: &str, raw_key: &str) -> Result<Self, IngestError> {
        let key = urlencoding::decode(raw_key)
            .map_err(|e| IngestError::InvalidEvent(format!("undecodable key '{raw_key}': {e}")))?
            .into_owned();
        let participant_id = key
            .split('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| IngestError::InvalidEvent(format!("key '{key}' has no participant segment")))?
            .to_string();
        Ok(Self {
            bucket: bucket.to_string(),
            key,
            participant_id,
        })
    }
}

impl S3Event {
    /// Snapshot named by the first record.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::InvalidEvent` for an event without records or
    /// with an unusable key.
    pub fn snapshot_location(&self) -> Result<SnapshotLocation, IngestError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| IngestError::InvalidEvent("event has no records".into()))?;
        SnapshotLocation::from_key(&record.s3.bucket.name, &record.s3.object.key)
    }
}
