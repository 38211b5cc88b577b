use calm_config::ConfigError;
use calm_core::enums::EarningsType;
use calm_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EarningsError {
    /// No fixed amount exists for a reward type that needs one.
    #[error("No amount configured for earnings type '{0}'")]
    MissingAmount(EarningsType),

    /// Unusable earnings configuration (rates, zone).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A study type failed to parse, e.g. an unrecognized condition.
    #[error(transparent)]
    Core(#[from] CoreError),
}
