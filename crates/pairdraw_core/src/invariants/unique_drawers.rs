//! Unique drawers invariant: every participant draws exactly once.

use super::Invariant;
use crate::engine::ExchangeComplete;
use std::collections::BTreeSet;

/// Invariant: Every roster member appears exactly once as a drawer.
///
/// No participant is skipped and none draws twice.
pub struct UniqueDrawersInvariant;

impl Invariant<ExchangeComplete> for UniqueDrawersInvariant {
    fn holds(complete: &ExchangeComplete) -> bool {
        let mut seen = BTreeSet::new();

        for assignment in complete.assignments() {
            if !complete.roster().contains(assignment.drawer()) {
                return false;
            }
            if !seen.insert(assignment.drawer().as_str()) {
                return false;
            }
        }

        seen.len() == complete.roster().len()
    }

    fn description() -> &'static str {
        "Every roster member appears exactly once as a drawer"
    }
}
