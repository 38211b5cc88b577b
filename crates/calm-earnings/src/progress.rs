//! Lifecycle transitions driven by the stages present in a batch of newly
//! ingested sessions.
//!
//! Each rule is checked against the same prior progress:
//!
//! ```text
//! stage 1 seen, status unset            → stage1Complete (stamp stage1CompletedOn)
//! stage 3 seen, status ≠ stage2Complete → stage2Complete (stamp stage2CompletedOn)
//! stage 4 seen, status ≠ complete       → complete
//! ```
//!
//! A rule whose target ranks below the prior status is not applied, and a
//! dropped participant is never moved.

use std::collections::BTreeSet;

use calm_core::civil::compact_date;
use calm_core::entities::{Progress, ProgressUpdate};
use calm_core::enums::{ProgressStatus, Stage};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Updates to apply, in order, for a batch containing `stages`.
///
/// `today` is the civil date stamped into completion markers.
#[must_use]
pub fn progress_transitions(
    prior: &Progress,
    stages: &BTreeSet<Stage>,
    today: NaiveDate,
) -> Vec<ProgressUpdate> {
    if prior.status == Some(ProgressStatus::Dropped) {
        debug!("participant dropped; progress left unchanged");
        return Vec::new();
    }

    let stamp = compact_date(today);
    let mut candidates = Vec::new();
    if stages.contains(&Stage::VisitOne) && prior.status.is_none() {
        candidates.push(ProgressUpdate {
            status: ProgressStatus::Stage1Complete,
            stage1_completed_on: Some(stamp.clone()),
            stage2_completed_on: None,
        });
    }
    if stages.contains(&Stage::Training) && prior.status != Some(ProgressStatus::Stage2Complete) {
        candidates.push(ProgressUpdate {
            status: ProgressStatus::Stage2Complete,
            stage1_completed_on: None,
            stage2_completed_on: Some(stamp),
        });
    }
    if stages.contains(&Stage::VisitTwo) && prior.status != Some(ProgressStatus::Complete) {
        candidates.push(ProgressUpdate {
            status: ProgressStatus::Complete,
            stage1_completed_on: None,
            stage2_completed_on: None,
        });
    }

    let prior_rank = prior.status.and_then(ProgressStatus::rank).unwrap_or(0);
    candidates
        .into_iter()
        .filter(|update| {
            let forward = update.status.rank().unwrap_or(0) > prior_rank;
            if !forward {
                warn!(
                    from = prior.status.map(ProgressStatus::as_str),
                    to = update.status.as_str(),
                    "ignoring backward progress transition"
                );
            }
            forward
        })
        .collect()
}
