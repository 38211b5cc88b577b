//! Snapshot sources: where uploaded snapshot files are fetched from.

use std::path::Path;
use std::sync::Arc;

use calm_config::{ConfigError, StorageConfig};
use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use tracing::debug;

use crate::error::IngestError;

/// Fetches a snapshot object to a local file.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    /// Download the object at `key` to `dest`, replacing any existing file.
    async fn fetch(&self, key: &str, dest: &Path) -> Result<(), IngestError>;
}

/// [`SnapshotSource`] over any `object_store` backend (S3 in production,
/// in-memory in tests).
pub struct ObjectStoreSource {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build an S3 source for `bucket`, using region, endpoint, and
    /// credentials from `config`. Without static credentials the ambient AWS
    /// credential chain applies.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Config` if the storage section is not
    /// configured, or `IngestError::Download` if the client cannot be built.
    pub fn s3(config: &StorageConfig, bucket: &str) -> Result<Self, IngestError> {
        if !config.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "storage".to_string(),
            }
            .into());
        }
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&config.region)
            .with_allow_http(config.allow_http);
        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
        }
        if config.has_static_credentials() {
            builder = builder
                .with_access_key_id(&config.access_key_id)
                .with_secret_access_key(&config.secret_access_key);
        }
        Ok(Self::new(Arc::new(builder.build()?)))
    }
}

impl SnapshotSource for ObjectStoreSource {
    async fn fetch(&self, key: &str, dest: &Path) -> Result<(), IngestError> {
        let path = object_store::path::Path::from(key);
        let bytes = self.store.get(&path).await?.bytes().await?;
        debug!(key, bytes = bytes.len(), "snapshot downloaded");
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}
