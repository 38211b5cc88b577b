use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Stage;

/// Upper bound of the emWave coherence scale; the inverse score mirrors
/// coherence against it.
pub const COHERENCE_CEILING: f64 = 10.0;

/// One completed biometric training session, as decoded from a snapshot.
///
/// Weighted scores are taken from the snapshot as-is. They are only derived
/// (see [`WeightedScores::derive`]) when an older snapshot lacks them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub emwave_session_id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start: DateTime<Utc>,
    pub duration_seconds: i64,
    pub avg_coherence: f64,
    pub weighted_avg_coherence: f64,
    pub weighted_inverse_coherence: f64,
    pub valid_status: i64,
    pub stage: Stage,
    pub emo_pic_name: Option<String>,
}

impl Session {
    /// Exact session length in minutes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }

    /// Session length rounded to whole minutes, as used for daily totals.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn rounded_minutes(&self) -> i64 {
        (self.duration_seconds as f64 / 60.0).round() as i64
    }

    /// Start instant as seconds since the epoch.
    #[must_use]
    pub fn start_secs(&self) -> i64 {
        self.start.timestamp()
    }
}

/// Duration-weighted coherence scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScores {
    pub weighted_avg_coherence: f64,
    pub weighted_inverse_coherence: f64,
}

impl WeightedScores {
    /// Scale raw coherence by `min(round(minutes), max)/max`.
    ///
    /// Sessions longer than `max_session_minutes` earn no extra weight.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn derive(avg_coherence: f64, duration_seconds: i64, max_session_minutes: u32) -> Self {
        let max = f64::from(max_session_minutes.max(1));
        let minutes = (duration_seconds as f64 / 60.0).round().clamp(0.0, max);
        let weight = minutes / max;
        Self {
            weighted_avg_coherence: weight * avg_coherence,
            weighted_inverse_coherence: weight * (COHERENCE_CEILING - avg_coherence),
        }
    }
}
