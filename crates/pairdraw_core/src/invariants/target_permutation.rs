//! Target permutation invariant: targets are a permutation of the roster.

use super::Invariant;
use crate::engine::ExchangeComplete;

/// Invariant: The targets of a completed draw are exactly the roster.
///
/// Every participant is given away exactly once, so together with unique
/// drawers the pairing is a permutation.
pub struct TargetPermutationInvariant;

impl Invariant<ExchangeComplete> for TargetPermutationInvariant {
    fn holds(complete: &ExchangeComplete) -> bool {
        if complete.assignments().len() != complete.roster().len() {
            return false;
        }

        let mut targets: Vec<&str> = complete
            .assignments()
            .iter()
            .map(|a| a.target().as_str())
            .collect();
        targets.sort_unstable();

        let mut names: Vec<&str> = complete.roster().iter().collect();
        names.sort_unstable();

        targets == names
    }

    fn description() -> &'static str {
        "Targets of a completed draw are a permutation of the roster"
    }
}
