//! Assignment records and degradation accounting.
//!
//! Pairings are first-class values: they can be displayed, serialized for
//! machine consumers, and inspected after the game. Constraint relaxations
//! travel with them instead of being swallowed.

use crate::letters::{Letter, LetterTier};
use crate::restriction::RestrictionSet;
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A finalized pairing: one drawer, their target, and the letter drawn.
#[derive(Debug, Clone, PartialEq, Eq, Display, Getters, Serialize, Deserialize)]
#[display("{} -> {} [{}]", drawer, target, letter)]
pub struct Assignment {
    /// The participant who drew.
    drawer: String,
    /// The participant they drew.
    target: String,
    /// The letter dispensed on this turn.
    letter: Letter,
}

impl Assignment {
    /// Creates a new pairing record.
    pub fn new(drawer: impl Into<String>, target: impl Into<String>, letter: Letter) -> Self {
        Self {
            drawer: drawer.into(),
            target: target.into(),
            letter,
        }
    }

    /// Whether the drawer drew themself.
    pub fn is_self_assignment(&self) -> bool {
        self.drawer == self.target
    }

    /// Replaces the target, returning the previous one.
    pub(crate) fn retarget(&mut self, target: String) -> String {
        std::mem::replace(&mut self.target, target)
    }
}

/// A constraint that had to be relaxed on a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Degradation {
    /// A forbidden pair was assigned anyway.
    #[display("restriction overridden: {} -> {}", drawer, target)]
    RestrictionOverridden {
        /// The drawer on the violating turn.
        drawer: String,
        /// The forbidden target they received.
        target: String,
    },

    /// A participant drew themself.
    #[display("self-assignment: {} drew themself", drawer)]
    SelfAssignment {
        /// The participant stuck with their own name.
        drawer: String,
    },
}

/// Everything one turn produced, returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The pairing recorded this turn.
    assignment: Assignment,
    /// Which fallback stage produced the letter.
    tier: LetterTier,
    /// The relaxation applied this turn, if any.
    degradation: Option<Degradation>,
    /// Whether an earlier pairing was rewritten to make this turn valid.
    swap_repaired: bool,
}

impl TurnRecord {
    pub(crate) fn new(
        assignment: Assignment,
        tier: LetterTier,
        degradation: Option<Degradation>,
        swap_repaired: bool,
    ) -> Self {
        Self {
            assignment,
            tier,
            degradation,
            swap_repaired,
        }
    }

    /// The letter drawn this turn.
    pub fn letter(&self) -> Letter {
        self.assignment.letter
    }

    /// The target assigned this turn.
    pub fn target(&self) -> &str {
        &self.assignment.target
    }

    /// Whether a constraint was relaxed this turn.
    pub fn degraded(&self) -> bool {
        self.degradation.is_some()
    }
}

/// Aggregated relaxation counts for a draw.
///
/// The restriction and self-assignment counts describe the final pairing
/// list; a retroactive swap can erase an override recorded on an earlier
/// turn, so the tallies are reconciled against the ledger when the game
/// completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DrawSummary {
    /// Pairings that violate a restriction.
    restriction_overrides: u32,
    /// Participants who drew themselves.
    self_assignments: u32,
    /// Letters handed out more than once.
    repeated_letters: u32,
    /// Letters handed out despite being excluded.
    exclusion_overrides: u32,
    /// Turns repaired by rewriting an earlier pairing.
    swap_repairs: u32,
}

impl DrawSummary {
    /// True iff the pairing constraints were relaxed anywhere.
    ///
    /// Letter repeats and exclusion overrides are reported but do not make
    /// the assignment itself degraded.
    pub fn degraded(&self) -> bool {
        self.restriction_overrides > 0 || self.self_assignments > 0
    }

    pub(crate) fn record_turn(&mut self, record: &TurnRecord) {
        match record.tier {
            LetterTier::Fresh => {}
            LetterTier::Reused => self.repeated_letters += 1,
            LetterTier::ExclusionIgnored => self.exclusion_overrides += 1,
        }
        match &record.degradation {
            Some(Degradation::RestrictionOverridden { .. }) => self.restriction_overrides += 1,
            Some(Degradation::SelfAssignment { .. }) => self.self_assignments += 1,
            None => {}
        }
        if record.swap_repaired {
            self.swap_repairs += 1;
        }
    }

    pub(crate) fn reconcile(&mut self, ledger: &[Assignment], restrictions: &RestrictionSet) {
        self.restriction_overrides = ledger
            .iter()
            .filter(|a| restrictions.forbids(a.drawer(), a.target()))
            .count() as u32;
        self.self_assignments = ledger.iter().filter(|a| a.is_self_assignment()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_display() {
        let a = Assignment::new("Alice", "Bob", Letter::K);
        assert_eq!(a.to_string(), "Alice -> Bob [K]");
    }

    #[test]
    fn test_summary_counts_turn_events() {
        let mut summary = DrawSummary::default();

        let clean = TurnRecord::new(
            Assignment::new("Alice", "Bob", Letter::A),
            LetterTier::Fresh,
            None,
            false,
        );
        let overridden = TurnRecord::new(
            Assignment::new("Bob", "Alice", Letter::B),
            LetterTier::Reused,
            Some(Degradation::RestrictionOverridden {
                drawer: "Bob".to_string(),
                target: "Alice".to_string(),
            }),
            false,
        );

        summary.record_turn(&clean);
        summary.record_turn(&overridden);

        assert_eq!(*summary.restriction_overrides(), 1);
        assert_eq!(*summary.repeated_letters(), 1);
        assert_eq!(*summary.self_assignments(), 0);
        assert!(summary.degraded());
    }

    #[test]
    fn test_reconcile_matches_final_ledger() {
        let mut restrictions = RestrictionSet::new();
        restrictions.add("Alice", "Bob").unwrap();

        // An override recorded during play that a later swap made moot.
        let mut summary = DrawSummary::default();
        summary.record_turn(&TurnRecord::new(
            Assignment::new("Alice", "Bob", Letter::A),
            LetterTier::Fresh,
            Some(Degradation::RestrictionOverridden {
                drawer: "Alice".to_string(),
                target: "Bob".to_string(),
            }),
            false,
        ));

        let ledger = vec![
            Assignment::new("Alice", "Carol", Letter::A),
            Assignment::new("Carol", "Carol", Letter::B),
        ];
        summary.reconcile(&ledger, &restrictions);

        assert_eq!(*summary.restriction_overrides(), 0);
        assert_eq!(*summary.self_assignments(), 1);
    }
}
