use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::civil::{parse_instant, render_instant};
use crate::enums::EarningsType;
use crate::errors::CoreError;

/// Composite ordering key of an earnings record: `(reward instant, type)`.
///
/// Unique per participant. Re-deriving the same reward produces the same key,
/// so a repeated write overwrites instead of duplicating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EarningKey {
    pub instant: DateTime<Utc>,
    pub earnings_type: EarningsType,
}

impl EarningKey {
    /// Render as `2024-03-09T09:00:00-08:00|per_hour`.
    #[must_use]
    pub fn render(&self, tz: Tz) -> String {
        format!("{}|{}", render_instant(self.instant, tz), self.earnings_type)
    }

    /// Parse a rendered key.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidKey` when the separator is missing, or the
    /// instant/type errors from their own parsers.
    pub fn parse(key: &str) -> Result<Self, CoreError> {
        let (instant, ty) = key
            .rsplit_once('|')
            .ok_or_else(|| CoreError::InvalidKey(key.to_string()))?;
        Ok(Self {
            instant: parse_instant(instant)?,
            earnings_type: ty.parse()?,
        })
    }
}

/// One monetary reward grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Earning {
    pub instant: DateTime<Utc>,
    pub earnings_type: EarningsType,
    /// Currency units, rounded to cents.
    pub amount: f64,
}

impl Earning {
    #[must_use]
    pub const fn key(&self) -> EarningKey {
        EarningKey {
            instant: self.instant,
            earnings_type: self.earnings_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Los_Angeles;

    #[test]
    fn key_renders_in_reference_zone() {
        let key = EarningKey {
            instant: parse_instant("2024-03-09T17:00:00Z").unwrap(),
            earnings_type: EarningsType::PerHour,
        };
        let rendered = key.render(Los_Angeles);
        assert_eq!(rendered, "2024-03-09T09:00:00-08:00|per_hour");
        assert_eq!(EarningKey::parse(&rendered).unwrap(), key);
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(matches!(
            EarningKey::parse("2024-03-09T09:00:00-08:00"),
            Err(CoreError::InvalidKey(_))
        ));
        assert!(matches!(
            EarningKey::parse("2024-03-09T09:00:00-08:00|tip"),
            Err(CoreError::InvalidEarningsType(_))
        ));
    }
}
