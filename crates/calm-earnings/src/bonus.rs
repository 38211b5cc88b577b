//! Coherence bonuses.
//!
//! Once a participant's cumulative training time first reaches the
//! eligibility threshold, each later training session on a day with a full
//! training target is compared against the participant's own history: a
//! metric in the top quarter earns a bonus. The history grows as the walk
//! proceeds, so sessions ingested together affect each other's cutoff.

use std::collections::HashMap;

use calm_core::civil::{EPOCH, civil_day};
use calm_core::entities::{Participant, Session};
use calm_core::enums::{Condition, EarningsType, Stage};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::{EarningsError, EarningsRules, Reward};

/// Per-session score ranked for bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoherenceMetric {
    /// Duration-weighted coherence (condition A).
    Weighted,
    /// Duration-weighted inverse coherence (condition B).
    WeightedInverse,
}

impl CoherenceMetric {
    #[must_use]
    pub const fn for_condition(condition: Condition) -> Self {
        match condition {
            Condition::A => Self::Weighted,
            Condition::B => Self::WeightedInverse,
        }
    }

    /// # Errors
    ///
    /// Returns `EarningsError::Core` if the participant's condition is
    /// missing or unrecognized.
    pub fn for_participant(participant: &Participant) -> Result<Self, EarningsError> {
        Ok(Self::for_condition(participant.condition()?))
    }

    fn selector(self) -> fn(&Session) -> f64 {
        match self {
            Self::Weighted => |s| s.weighted_avg_coherence,
            Self::WeightedInverse => |s| s.weighted_inverse_coherence,
        }
    }

    #[must_use]
    pub fn value(self, session: &Session) -> f64 {
        (self.selector())(session)
    }
}

/// Start instant of the training session during which cumulative training
/// time first reached `threshold_minutes`.
#[must_use]
pub fn eligibility_crossing(training: &[&Session], threshold_minutes: u32) -> Option<DateTime<Utc>> {
    let threshold = f64::from(threshold_minutes);
    let mut total = 0.0;
    training.iter().find_map(|s| {
        total += s.minutes();
        (total >= threshold).then_some(s.start)
    })
}

/// Value at the top-25% rank of a descending history, if the history is
/// non-empty.
fn top_quarter_cutoff(history: &[f64]) -> Option<f64> {
    let rank = history.len().div_ceil(4);
    rank.checked_sub(1).and_then(|i| history.get(i)).copied()
}

fn insert_descending(history: &mut Vec<f64>, value: f64) {
    let pos = history.partition_point(|&v| v > value);
    history.insert(pos, value);
}

/// Bonus rewards for training sessions after the later of the eligibility
/// crossing and `last_bonus`, oldest first.
#[must_use]
pub fn bonus_rewards(
    sessions: &[Session],
    last_bonus: Option<DateTime<Utc>>,
    metric: CoherenceMetric,
    rules: &EarningsRules,
) -> Vec<Reward> {
    let config = rules.config();
    let tz = rules.tz();

    let mut training: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.stage == Stage::Training)
        .collect();
    training.sort_by_key(|s| s.start);

    let Some(crossing) = eligibility_crossing(&training, config.bonus_eligibility_minutes) else {
        debug!(
            threshold = config.bonus_eligibility_minutes,
            "bonus eligibility not reached"
        );
        return Vec::new();
    };
    let boundary = crossing.max(last_bonus.unwrap_or(EPOCH));
    let start_day = civil_day(boundary, tz);

    let mut minutes_by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for session in &training {
        let day = civil_day(session.start, tz);
        if day >= start_day {
            *minutes_by_day.entry(day).or_default() += session.rounded_minutes();
        }
    }
    let target = i64::from(config.daily_training_minutes);

    let (seed, candidates): (Vec<&Session>, Vec<&Session>) =
        training.iter().copied().partition(|s| s.start <= boundary);
    let mut history: Vec<f64> = seed.iter().map(|s| metric.value(s)).collect();
    history.sort_by(|a, b| b.total_cmp(a));

    let mut rewards = Vec::new();
    for session in candidates {
        let day = civil_day(session.start, tz);
        if minutes_by_day.get(&day).copied().unwrap_or(0) < target {
            continue;
        }
        let value = metric.value(session);
        if top_quarter_cutoff(&history).is_some_and(|cutoff| value >= cutoff) {
            rewards.push(Reward {
                instant: session.start,
                earnings_type: EarningsType::Bonus,
            });
        }
        insert_descending(&mut history, value);
    }
    debug!(
        %boundary,
        history = history.len(),
        bonuses = rewards.len(),
        "bonus walk finished"
    );
    rewards
}
