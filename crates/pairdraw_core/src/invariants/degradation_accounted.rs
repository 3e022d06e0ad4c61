//! Degradation accounting invariant: the summary matches the final pairings.

use super::Invariant;
use crate::engine::ExchangeComplete;

/// Invariant: Every relaxed rule in the final pairings is counted.
///
/// The summary's restriction-override and self-assignment counts must equal
/// the number of forbidden and self pairings actually present in the result.
pub struct DegradationAccountedInvariant;

impl Invariant<ExchangeComplete> for DegradationAccountedInvariant {
    fn holds(complete: &ExchangeComplete) -> bool {
        let overrides = complete
            .assignments()
            .iter()
            .filter(|a| complete.restrictions().forbids(a.drawer(), a.target()))
            .count() as u32;

        let self_assignments = complete
            .assignments()
            .iter()
            .filter(|a| a.is_self_assignment())
            .count() as u32;

        *complete.summary().restriction_overrides() == overrides
            && *complete.summary().self_assignments() == self_assignments
    }

    fn description() -> &'static str {
        "Relaxed rules in the final pairings match the summary counts"
    }
}
