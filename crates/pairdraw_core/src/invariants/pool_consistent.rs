//! Pool consistency invariant: the target pool and ledger partition the roster.

use super::Invariant;
use crate::engine::ExchangeInProgress;
use std::collections::BTreeSet;

/// Invariant: Undrawn targets and already-assigned targets partition the roster.
///
/// Holds after every turn of an in-progress draw: each roster name is either
/// still in the pool or the target of exactly one recorded pairing, never
/// both and never neither.
pub struct PoolConsistentInvariant;

impl Invariant<ExchangeInProgress> for PoolConsistentInvariant {
    fn holds(game: &ExchangeInProgress) -> bool {
        let roster = game.roster();

        if game.targets_remaining() + game.assignments().len() != roster.len() {
            return false;
        }

        let mut taken = BTreeSet::new();
        for assignment in game.assignments() {
            if !roster.contains(assignment.target()) {
                return false;
            }
            if !taken.insert(assignment.target().as_str()) {
                return false;
            }
        }

        game.pool()
            .iter()
            .all(|name| roster.contains(name) && !taken.contains(name.as_str()))
    }

    fn description() -> &'static str {
        "Pool and assigned targets partition the roster"
    }
}
