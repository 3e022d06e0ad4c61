//! First-class invariants for the draw engine.
//!
//! Invariants are logical properties that must hold for every draw the engine
//! produces. They are testable independently and serve as documentation of
//! system guarantees.

/// A logical property that must hold for a given state.
///
/// Invariants express system guarantees that should never be violated.
/// They are checked in debug builds and can be tested independently.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// This trait enables composition of multiple invariants into a single
/// verification step. Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

// Implement InvariantSet for 3-tuples
impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

// Implement InvariantSet for 2-tuples
impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod degradation_accounted;
pub mod pool_consistent;
pub mod target_permutation;
pub mod unique_drawers;

pub use degradation_accounted::DegradationAccountedInvariant;
pub use pool_consistent::PoolConsistentInvariant;
pub use target_permutation::TargetPermutationInvariant;
pub use unique_drawers::UniqueDrawersInvariant;

// Completed-draw invariant set (all result invariants)
/// All completed-draw invariants as a composable set.
pub type ExchangeInvariants = (
    UniqueDrawersInvariant,
    TargetPermutationInvariant,
    DegradationAccountedInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExchangeSetup;
    use crate::roster::Roster;

    #[test]
    fn test_invariant_set_holds_for_batch_draw() {
        let roster = Roster::from_names(["Alice", "Bob", "Carol", "Dave"]).unwrap();
        let complete = ExchangeSetup::new(roster).with_seed(11).assign_all();

        assert!(ExchangeInvariants::check_all(&complete).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_under_heavy_restrictions() {
        let roster = Roster::from_names(["Alice", "Bob", "Carol"]).unwrap();
        let mut setup = ExchangeSetup::new(roster).with_seed(7);
        setup.add_restriction("Alice", "Bob").unwrap();
        setup.add_restriction("Alice", "Carol").unwrap();

        let complete = setup.assign_all();
        assert!(ExchangeInvariants::check_all(&complete).is_ok());
    }

    #[test]
    fn test_two_invariants_as_set() {
        let roster = Roster::from_names(["Alice", "Bob"]).unwrap();
        let complete = ExchangeSetup::new(roster).with_seed(3).assign_all();

        type TwoInvariants = (UniqueDrawersInvariant, TargetPermutationInvariant);
        assert!(TwoInvariants::check_all(&complete).is_ok());
    }
}
