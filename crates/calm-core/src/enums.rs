//! Study enums: lifecycle stages, earnings types, progress status, and
//! experimental condition.
//!
//! String forms match what the ledger and participant stores persist.
//! `ProgressStatus` provides `rank()` so callers can tell forward moves
//! from backward ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Lifecycle stage a session belongs to.
///
/// ```text
/// 1 visit_one (in lab) → 2 practice → 3 training (at home) → 4 visit_two (in lab)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Stage {
    VisitOne,
    Practice,
    Training,
    VisitTwo,
}

impl Stage {
    /// The integer persisted in snapshot and ledger rows.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::VisitOne => 1,
            Self::Practice => 2,
            Self::Training => 3,
            Self::VisitTwo => 4,
        }
    }
}

impl TryFrom<i64> for Stage {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::VisitOne),
            2 => Ok(Self::Practice),
            3 => Ok(Self::Training),
            4 => Ok(Self::VisitTwo),
            other => Err(CoreError::InvalidStage(other)),
        }
    }
}

impl From<Stage> for i64 {
    fn from(stage: Stage) -> Self {
        stage.as_i64()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

// ---------------------------------------------------------------------------
// EarningsType
// ---------------------------------------------------------------------------

/// Kind of monetary reward recorded in the earnings ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EarningsType {
    #[serde(rename = "per_hour")]
    PerHour,
    #[serde(rename = "lumosity")]
    Lumosity,
    #[serde(rename = "bonus")]
    Bonus,
    #[serde(rename = "visit1")]
    Visit1,
    #[serde(rename = "visit2")]
    Visit2,
}

impl EarningsType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerHour => "per_hour",
            Self::Lumosity => "lumosity",
            Self::Bonus => "bonus",
            Self::Visit1 => "visit1",
            Self::Visit2 => "visit2",
        }
    }
}

impl FromStr for EarningsType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_hour" => Ok(Self::PerHour),
            "lumosity" => Ok(Self::Lumosity),
            "bonus" => Ok(Self::Bonus),
            "visit1" => Ok(Self::Visit1),
            "visit2" => Ok(Self::Visit2),
            other => Err(CoreError::InvalidEarningsType(other.to_string())),
        }
    }
}

impl fmt::Display for EarningsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProgressStatus
// ---------------------------------------------------------------------------

/// Coarse study status of a participant. An unset status means "active".
///
/// ```text
/// (unset) → stage1Complete → stage2Complete → complete
/// dropped (set externally, terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressStatus {
    #[serde(rename = "stage1Complete")]
    Stage1Complete,
    #[serde(rename = "stage2Complete")]
    Stage2Complete,
    #[serde(rename = "complete")]
    Complete,
    #[serde(rename = "dropped")]
    Dropped,
}

impl ProgressStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stage1Complete => "stage1Complete",
            Self::Stage2Complete => "stage2Complete",
            Self::Complete => "complete",
            Self::Dropped => "dropped",
        }
    }

    /// Position in the forward sequence; `None` for the terminal `Dropped`.
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Stage1Complete => Some(1),
            Self::Stage2Complete => Some(2),
            Self::Complete => Some(3),
            Self::Dropped => None,
        }
    }
}

impl FromStr for ProgressStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stage1Complete" => Ok(Self::Stage1Complete),
            "stage2Complete" => Ok(Self::Stage2Complete),
            "complete" => Ok(Self::Complete),
            "dropped" => Ok(Self::Dropped),
            other => Err(CoreError::Validation(format!(
                "unrecognized progress status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Experimental condition a participant is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    A,
    B,
}

impl Condition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl FromStr for Condition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            other => Err(CoreError::UnknownCondition(other.to_string())),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Stage::VisitOne)]
    #[case(2, Stage::Practice)]
    #[case(3, Stage::Training)]
    #[case(4, Stage::VisitTwo)]
    fn stage_from_integer(#[case] raw: i64, #[case] expected: Stage) {
        assert_eq!(Stage::try_from(raw).unwrap(), expected);
        assert_eq!(expected.as_i64(), raw);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(-1)]
    fn stage_out_of_range_is_rejected(#[case] raw: i64) {
        assert!(matches!(
            Stage::try_from(raw),
            Err(CoreError::InvalidStage(v)) if v == raw
        ));
    }

    #[test]
    fn stage_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Stage::Training).unwrap(), "3");
        let stage: Stage = serde_json::from_str("4").unwrap();
        assert_eq!(stage, Stage::VisitTwo);
        assert!(serde_json::from_str::<Stage>("9").is_err());
    }

    #[test]
    fn earnings_type_strings_match_serde() {
        for ty in [
            EarningsType::PerHour,
            EarningsType::Lumosity,
            EarningsType::Bonus,
            EarningsType::Visit1,
            EarningsType::Visit2,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
            assert_eq!(ty.as_str().parse::<EarningsType>().unwrap(), ty);
        }
        assert!("hourly".parse::<EarningsType>().is_err());
    }

    #[test]
    fn progress_rank_orders_forward_sequence() {
        assert!(ProgressStatus::Stage1Complete.rank() < ProgressStatus::Stage2Complete.rank());
        assert!(ProgressStatus::Stage2Complete.rank() < ProgressStatus::Complete.rank());
        assert_eq!(ProgressStatus::Dropped.rank(), None);
    }

    #[test]
    fn unknown_condition_is_an_error() {
        assert_eq!("B".parse::<Condition>().unwrap(), Condition::B);
        assert!(matches!(
            "C".parse::<Condition>(),
            Err(CoreError::UnknownCondition(c)) if c == "C"
        ));
    }
}
