//! Picks which eligible candidates get an interaction attempt.
use serde::{Deserialize, Serialize};

use super::eligibility::Eligible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// One attempt per check, on the closest candidate.
    Nearest,
    /// An attempt on every eligible candidate, closest first.
    AllEligible,
}

pub fn select<O>(policy: SelectionPolicy, mut eligible: Vec<Eligible<O>>) -> Vec<Eligible<O>> {
    // Stable sort keeps scan order between equidistant candidates.
    eligible.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    if policy == SelectionPolicy::Nearest {
        eligible.truncate(1);
    }
    eligible
}
