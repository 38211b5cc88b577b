//! Time rewards: pay per training minute, capped per civil day.

use std::collections::HashMap;

use calm_core::civil::{EPOCH, civil_day};
use calm_core::entities::{Earning, Session};
use calm_core::enums::{EarningsType, Stage};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::EarningsRules;

/// One training session's claim to time-based pay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeReward {
    pub instant: DateTime<Utc>,
    pub minutes: f64,
}

/// Candidate time rewards for training sessions newer than the last time
/// reward, oldest first.
#[must_use]
pub fn time_rewards(sessions: &[Session], last_time_reward: Option<DateTime<Utc>>) -> Vec<TimeReward> {
    let after = last_time_reward.unwrap_or(EPOCH);
    let mut rewards: Vec<_> = sessions
        .iter()
        .filter(|s| s.stage == Stage::Training && s.start > after)
        .map(|s| TimeReward {
            instant: s.start,
            minutes: s.minutes(),
        })
        .collect();
    rewards.sort_by_key(|r| r.instant);
    rewards
}

#[allow(clippy::cast_possible_truncation)]
fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// `rate * minutes / 60`, rounded to the cent.
#[must_use]
pub fn hourly_cents(per_hour_rate: f64, minutes: f64) -> i64 {
    to_cents(per_hour_rate * minutes / 60.0)
}

/// Price time rewards, clamping each civil day's total at the daily cap.
///
/// Day totals start from the prior time earnings and include rewards priced
/// earlier in this call. A reward on a day that is already capped is still
/// returned, at `0.00`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn apply_daily_cap(rewards: &[TimeReward], prior: &[Earning], rules: &EarningsRules) -> Vec<Earning> {
    let config = rules.config();
    let tz = rules.tz();
    let cap = to_cents(config.max_daily_time_earnings);

    let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for earning in prior.iter().filter(|e| e.earnings_type == EarningsType::PerHour) {
        *by_day.entry(civil_day(earning.instant, tz)).or_default() += to_cents(earning.amount);
    }

    rewards
        .iter()
        .map(|reward| {
            let day = civil_day(reward.instant, tz);
            let already = by_day.entry(day).or_default();
            let full = hourly_cents(config.per_hour_rate, reward.minutes);
            let cents = if *already + full > cap {
                let remaining = (cap - *already).max(0);
                debug!(
                    %day,
                    minutes = reward.minutes,
                    credited_minutes = remaining as f64 / 100.0 / config.per_hour_rate * 60.0,
                    "time reward clamped to daily cap"
                );
                remaining
            } else {
                full
            };
            *already += cents;
            Earning {
                instant: reward.instant,
                earnings_type: EarningsType::PerHour,
                amount: cents as f64 / 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use calm_config::EarningsConfig;
    use calm_core::enums::Stage;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::fixtures::{at, rules, rules_with, staged, training};

    fn amounts(earnings: &[Earning]) -> Vec<f64> {
        earnings.iter().map(|e| e.amount).collect()
    }

    #[test]
    fn three_sessions_on_one_day_hit_the_cap_exactly() {
        let sessions = vec![
            training("2024-03-09T16:00:00Z", 13, 1.0),
            training("2024-03-09T17:00:00Z", 13, 1.0),
            training("2024-03-09T18:00:00Z", 13, 1.0),
        ];
        let rewards = time_rewards(&sessions, None);
        let earnings = apply_daily_cap(&rewards, &[], &rules());

        assert_eq!(amounts(&earnings), vec![2.17, 2.17, 1.66]);
        let total: i64 = earnings.iter().map(|e| to_cents(e.amount)).sum();
        assert_eq!(total, 600);
    }

    #[test]
    fn prior_earnings_count_toward_the_day() {
        let prior = vec![Earning {
            instant: at("2024-03-09T16:00:00Z"),
            earnings_type: EarningsType::PerHour,
            amount: 5.0,
        }];
        let rewards = time_rewards(&[training("2024-03-09T20:00:00Z", 18, 1.0)], Some(prior[0].instant));
        let earnings = apply_daily_cap(&rewards, &prior, &rules());
        assert_eq!(amounts(&earnings), vec![1.0]);
    }

    #[test]
    fn capped_day_still_emits_zero_reward() {
        let prior = vec![Earning {
            instant: at("2024-03-09T16:00:00Z"),
            earnings_type: EarningsType::PerHour,
            amount: 6.0,
        }];
        let rewards = time_rewards(&[training("2024-03-09T20:00:00Z", 18, 1.0)], None);
        let earnings = apply_daily_cap(&rewards, &prior, &rules());
        assert_eq!(amounts(&earnings), vec![0.0]);
    }

    #[test]
    fn days_are_capped_independently_in_reference_zone() {
        // 06:00Z on the 10th is still March 9 in Los Angeles; 09:00Z is 01:00 on March 10.
        let sessions = vec![
            training("2024-03-09T20:00:00Z", 30, 1.0),
            training("2024-03-10T06:00:00Z", 30, 1.0),
            training("2024-03-10T09:00:00Z", 30, 1.0),
        ];
        let earnings = apply_daily_cap(&time_rewards(&sessions, None), &[], &rules());
        assert_eq!(amounts(&earnings), vec![5.0, 1.0, 5.0]);
    }

    #[test]
    fn other_earnings_types_do_not_count_toward_cap() {
        let prior = vec![Earning {
            instant: at("2024-03-09T16:00:00Z"),
            earnings_type: EarningsType::Bonus,
            amount: 6.0,
        }];
        let rewards = time_rewards(&[training("2024-03-09T20:00:00Z", 18, 1.0)], None);
        assert_eq!(amounts(&apply_daily_cap(&rewards, &prior, &rules())), vec![3.0]);
    }

    #[test]
    fn sessions_at_or_before_last_reward_are_not_reemitted() {
        let sessions = vec![
            training("2024-03-09T16:00:00Z", 10, 1.0),
            training("2024-03-09T17:00:00Z", 10, 1.0),
            training("2024-03-09T18:00:00Z", 10, 1.0),
        ];
        let rewards = time_rewards(&sessions, Some(at("2024-03-09T17:00:00Z")));
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].instant, at("2024-03-09T18:00:00Z"));
    }

    #[rstest]
    #[case(Stage::VisitOne)]
    #[case(Stage::Practice)]
    #[case(Stage::VisitTwo)]
    fn only_training_sessions_earn_time(#[case] stage: Stage) {
        let sessions = vec![staged("2024-03-09T16:00:00Z", stage)];
        assert!(time_rewards(&sessions, None).is_empty());
    }

    #[test]
    fn rewards_come_out_oldest_first() {
        let sessions = vec![
            training("2024-03-09T18:00:00Z", 10, 1.0),
            training("2024-03-09T16:00:00Z", 10, 1.0),
        ];
        let rewards = time_rewards(&sessions, None);
        assert!(rewards[0].instant < rewards[1].instant);
    }

    #[test]
    fn custom_rate_and_cap() {
        let config = EarningsConfig {
            per_hour_rate: 12.0,
            max_daily_time_earnings: 4.0,
            ..EarningsConfig::default()
        };
        let sessions = vec![
            training("2024-03-09T16:00:00Z", 15, 1.0),
            training("2024-03-09T17:00:00Z", 15, 1.0),
        ];
        let earnings = apply_daily_cap(&time_rewards(&sessions, None), &[], &rules_with(config));
        assert_eq!(amounts(&earnings), vec![3.0, 1.0]);
    }
}
