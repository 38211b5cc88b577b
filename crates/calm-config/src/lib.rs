//! # calm-config
//!
//! Layered configuration loading for the CALM ingestion engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CALM_*` prefix, `__` as separator)
//! 2. Project-level `calm.toml`
//! 3. User-level `~/.config/calm/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CALM_LEDGER__DB_PATH` -> `ledger.db_path`,
//! `CALM_EARNINGS__PER_HOUR_RATE` -> `earnings.per_hour_rate`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use calm_config::CalmConfig;
//!
//! let config = CalmConfig::load_with_dotenv().expect("config");
//! if config.storage.is_configured() {
//!     println!("bucket: {}", config.storage.bucket);
//! }
//! ```

mod earnings;
mod error;
mod ledger;
mod retry;
mod storage;

pub use earnings::EarningsConfig;
pub use error::ConfigError;
pub use ledger::LedgerConfig;
pub use retry::RetrySettings;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalmConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub earnings: EarningsConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl CalmConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    /// The ledger and earnings sections are validated after extraction.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.ledger.validate()?;
        config.earnings.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("calm.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CALM_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("calm").join("config.toml"))
    }
}
