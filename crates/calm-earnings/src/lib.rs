//! # calm-earnings
//!
//! Pure reward calculators and the progress state machine. Nothing here
//! touches a store: callers pass in decoded sessions and prior earnings and
//! get back rewards to persist.
//!
//! - [`time`]: per-session time rewards and the daily cap
//! - [`bonus`]: top-25% coherence bonuses once a participant is eligible
//! - [`visit`]: one-time in-lab visit rewards
//! - [`progress`]: forward-only lifecycle transitions

pub mod bonus;
pub mod error;
pub mod progress;
pub mod time;
pub mod visit;

use calm_config::EarningsConfig;
use calm_core::entities::Earning;
use calm_core::enums::EarningsType;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub use error::EarningsError;

/// A reward a calculator decided to grant, not yet priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub instant: DateTime<Utc>,
    pub earnings_type: EarningsType,
}

/// Validated earnings configuration with its reference zone resolved.
#[derive(Debug, Clone)]
pub struct EarningsRules {
    config: EarningsConfig,
    tz: Tz,
}

impl EarningsRules {
    /// # Errors
    ///
    /// Returns `EarningsError::Config` if the configuration fails validation.
    pub fn new(config: EarningsConfig) -> Result<Self, EarningsError> {
        config.validate()?;
        let tz = config.tz()?;
        Ok(Self { config, tz })
    }

    #[must_use]
    pub const fn config(&self) -> &EarningsConfig {
        &self.config
    }

    /// Zone that defines civil days and renders earnings keys.
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.tz
    }

    /// Price a fixed-amount reward.
    ///
    /// # Errors
    ///
    /// Returns `EarningsError::MissingAmount` for types priced by duration.
    pub fn price(&self, reward: Reward) -> Result<Earning, EarningsError> {
        let amount = self
            .config
            .fixed_amount(reward.earnings_type)
            .ok_or(EarningsError::MissingAmount(reward.earnings_type))?;
        Ok(Earning {
            instant: reward.instant,
            earnings_type: reward.earnings_type,
            amount,
        })
    }
}

/// Instant of the most recent prior earning of `earnings_type`.
#[must_use]
pub fn latest_instant(prior: &[Earning], earnings_type: EarningsType) -> Option<DateTime<Utc>> {
    prior
        .iter()
        .filter(|e| e.earnings_type == earnings_type)
        .map(|e| e.instant)
        .max()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use calm_config::EarningsConfig;
    use calm_core::civil::parse_instant;
    use calm_core::entities::Session;
    use calm_core::enums::Stage;
    use chrono::{DateTime, Utc};

    use crate::EarningsRules;

    pub fn rules() -> EarningsRules {
        EarningsRules::new(EarningsConfig::default()).unwrap()
    }

    pub fn rules_with(config: EarningsConfig) -> EarningsRules {
        EarningsRules::new(config).unwrap()
    }

    pub fn at(rfc3339: &str) -> DateTime<Utc> {
        parse_instant(rfc3339).unwrap()
    }

    /// A stage-3 session; `weighted` is used for both coherence metrics'
    /// inputs (inverse = 10 - weighted).
    pub fn training(start: &str, minutes: i64, weighted: f64) -> Session {
        Session {
            emwave_session_id: format!("s-{start}"),
            start: at(start),
            duration_seconds: minutes * 60,
            avg_coherence: weighted,
            weighted_avg_coherence: weighted,
            weighted_inverse_coherence: 10.0 - weighted,
            valid_status: 1,
            stage: Stage::Training,
            emo_pic_name: None,
        }
    }

    pub fn staged(start: &str, stage: Stage) -> Session {
        Session {
            stage,
            ..training(start, 18, 1.0)
        }
    }
}
