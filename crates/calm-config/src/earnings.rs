//! Earnings rules: rates, fixed amounts, caps, and thresholds.

use calm_core::enums::EarningsType;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_per_hour_rate() -> f64 {
    10.0
}

const fn default_bonus_amount() -> f64 {
    6.0
}

const fn default_visit_amount() -> f64 {
    25.0
}

const fn default_lumosity_amount() -> f64 {
    2.0
}

const fn default_max_daily_time_earnings() -> f64 {
    6.0
}

/// Full daily training target, also the longest session credited for weighting.
const fn default_daily_training_minutes() -> u32 {
    18
}

const fn default_bonus_eligibility_minutes() -> u32 {
    360
}

fn default_timezone() -> String {
    String::from("America/Los_Angeles")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EarningsConfig {
    #[serde(default = "default_per_hour_rate")]
    pub per_hour_rate: f64,

    #[serde(default = "default_bonus_amount")]
    pub bonus_amount: f64,

    #[serde(default = "default_visit_amount")]
    pub visit1_amount: f64,

    #[serde(default = "default_visit_amount")]
    pub visit2_amount: f64,

    #[serde(default = "default_lumosity_amount")]
    pub lumosity_amount: f64,

    /// Cap on time-based earnings per civil day.
    #[serde(default = "default_max_daily_time_earnings")]
    pub max_daily_time_earnings: f64,

    #[serde(default = "default_daily_training_minutes")]
    pub daily_training_minutes: u32,

    /// Cumulative training minutes before bonuses can be earned.
    #[serde(default = "default_bonus_eligibility_minutes")]
    pub bonus_eligibility_minutes: u32,

    /// IANA zone used to compute civil days.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for EarningsConfig {
    fn default() -> Self {
        Self {
            per_hour_rate: default_per_hour_rate(),
            bonus_amount: default_bonus_amount(),
            visit1_amount: default_visit_amount(),
            visit2_amount: default_visit_amount(),
            lumosity_amount: default_lumosity_amount(),
            max_daily_time_earnings: default_max_daily_time_earnings(),
            daily_training_minutes: default_daily_training_minutes(),
            bonus_eligibility_minutes: default_bonus_eligibility_minutes(),
            timezone: default_timezone(),
        }
    }
}

impl EarningsConfig {
    /// Resolve the reference time zone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `timezone` is not an IANA name.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "earnings.timezone".into(),
                reason: e.to_string(),
            })
    }

    /// Fixed amount granted for a reward type. Time-based rewards have no
    /// fixed amount; they are priced by [`Self::per_hour_rate`].
    pub const fn fixed_amount(&self, earnings_type: EarningsType) -> Option<f64> {
        match earnings_type {
            EarningsType::PerHour => None,
            EarningsType::Bonus => Some(self.bonus_amount),
            EarningsType::Visit1 => Some(self.visit1_amount),
            EarningsType::Visit2 => Some(self.visit2_amount),
            EarningsType::Lumosity => Some(self.lumosity_amount),
        }
    }

    /// Check rates and thresholds for values the calculators cannot use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: format!("earnings.{field}"),
            reason: reason.to_string(),
        };
        if self.per_hour_rate <= 0.0 {
            return Err(invalid("per_hour_rate", "must be positive"));
        }
        if self.max_daily_time_earnings < 0.0 {
            return Err(invalid("max_daily_time_earnings", "must not be negative"));
        }
        if self.daily_training_minutes == 0 {
            return Err(invalid("daily_training_minutes", "must be at least 1"));
        }
        self.tz()?;
        Ok(())
    }
}
