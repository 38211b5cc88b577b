//! One-time in-lab visit rewards.

use calm_core::entities::Session;
use calm_core::enums::{EarningsType, Stage};

use crate::Reward;

/// In-lab visit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    One,
    Two,
}

impl Visit {
    #[must_use]
    pub const fn stage(self) -> Stage {
        match self {
            Self::One => Stage::VisitOne,
            Self::Two => Stage::VisitTwo,
        }
    }

    #[must_use]
    pub const fn earnings_type(self) -> EarningsType {
        match self {
            Self::One => EarningsType::Visit1,
            Self::Two => EarningsType::Visit2,
        }
    }
}

/// Reward for `visit`, keyed to the latest session of its stage; `None`
/// when the snapshot has no session of that stage.
#[must_use]
pub fn visit_reward(sessions: &[Session], visit: Visit) -> Option<Reward> {
    sessions
        .iter()
        .filter(|s| s.stage == visit.stage())
        .map(|s| s.start)
        .max()
        .map(|instant| Reward {
            instant,
            earnings_type: visit.earnings_type(),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixtures::{at, staged};

    #[test]
    fn keyed_to_latest_session_of_stage() {
        let sessions = vec![
            staged("2024-03-01T17:00:00Z", Stage::VisitOne),
            staged("2024-03-01T18:00:00Z", Stage::VisitOne),
            staged("2024-03-02T17:00:00Z", Stage::Training),
        ];
        assert_eq!(
            visit_reward(&sessions, Visit::One),
            Some(Reward {
                instant: at("2024-03-01T18:00:00Z"),
                earnings_type: EarningsType::Visit1,
            })
        );
    }

    #[test]
    fn absent_stage_yields_nothing() {
        let sessions = vec![staged("2024-03-01T17:00:00Z", Stage::VisitOne)];
        assert_eq!(visit_reward(&sessions, Visit::Two), None);
    }

    #[test]
    fn visit_two_uses_stage_four() {
        let sessions = vec![staged("2024-04-20T17:00:00Z", Stage::VisitTwo)];
        let reward = visit_reward(&sessions, Visit::Two).unwrap();
        assert_eq!(reward.earnings_type, EarningsType::Visit2);
    }
}
