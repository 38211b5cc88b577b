//! Snapshot bucket (S3-compatible object storage) configuration.

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    String::from("us-west-2")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket snapshots are uploaded to. Trigger events may name another one.
    #[serde(default)]
    pub bucket: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint URL (e.g. a local S3 emulator). Empty for AWS.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    /// Allow plain-HTTP endpoints.
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            allow_http: false,
        }
    }
}

impl StorageConfig {
    /// Check if the storage config has the minimum required fields.
    ///
    /// Credentials are optional: without them the ambient AWS credential
    /// chain is used.
    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty() && !self.region.is_empty()
    }

    /// Whether static credentials were supplied.
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = StorageConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.region, "us-west-2");
        assert!(!config.has_static_credentials());
    }

    #[test]
    fn configured_with_bucket_only() {
        let config = StorageConfig {
            bucket: "calm-snapshots".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn static_credentials_need_both_halves() {
        let config = StorageConfig {
            access_key_id: "key".into(),
            ..Default::default()
        };
        assert!(!config.has_static_credentials());
    }
}
