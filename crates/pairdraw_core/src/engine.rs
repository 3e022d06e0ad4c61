//! Draw phases and the assignment algorithm.
//!
//! Each phase of a draw is its own type with phase-specific fields:
//! configuration accumulates in [`ExchangeSetup`], turns mutate
//! [`ExchangeInProgress`], and [`ExchangeComplete`] is read-only. Transitions
//! between phases consume the previous phase, so a completed draw cannot be
//! mutated and a setup cannot take turns.
//!
//! The algorithm is a greedy randomized single pass: each turn picks a
//! uniformly random unrestricted target from the shrinking pool, falling back
//! to a restriction override and finally to a self-assignment when the
//! restriction graph leaves no alternative. The "last participant can only
//! draw themself" case is repaired by retargeting an earlier pairing instead
//! of degrading.

use crate::assignment::{Assignment, Degradation, DrawSummary, TurnRecord};
use crate::invariants::{ExchangeInvariants, Invariant, InvariantSet, PoolConsistentInvariant};
use crate::letters::{Letter, LetterPool};
use crate::restriction::{Restriction, RestrictionError, RestrictionSet};
use crate::roster::Roster;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// Draw in setup phase: restrictions and letter exclusions accumulate here.
///
/// The roster is fixed at construction; loading different participants means
/// building a new setup.
#[derive(Debug, Clone)]
pub struct ExchangeSetup {
    roster: Roster,
    restrictions: RestrictionSet,
    excluded: BTreeSet<Letter>,
    rng: ChaCha8Rng,
}

impl ExchangeSetup {
    /// Creates a setup over the given roster, seeded from the OS.
    #[instrument(skip(roster), fields(participants = roster.len()))]
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            restrictions: RestrictionSet::new(),
            excluded: BTreeSet::new(),
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Replaces the random source with a seeded one for reproducible draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Adds a forbidden pair. Both names must be on the roster.
    #[instrument(skip(self))]
    pub fn add_restriction(&mut self, a: &str, b: &str) -> Result<(), RestrictionError> {
        for name in [a, b] {
            let name = name.trim();
            if !self.roster.contains(name) {
                return Err(RestrictionError::UnknownParticipant {
                    name: name.to_string(),
                });
            }
        }
        self.restrictions.add(a, b)
    }

    /// Removes a restriction by insertion index.
    pub fn remove_restriction(&mut self, index: usize) -> Option<Restriction> {
        self.restrictions.remove(index)
    }

    /// Replaces the letter exclusion set for this game.
    #[instrument(skip(self, letters))]
    pub fn set_excluded_letters(&mut self, letters: impl IntoIterator<Item = Letter>) {
        self.excluded = letters.into_iter().collect();
        debug!(excluded = self.excluded.len(), "Letter exclusions set");
    }

    /// The roster this draw runs over.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Restrictions configured so far.
    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    /// Excluded letters in alphabetical order.
    pub fn excluded_letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.excluded.iter().copied()
    }

    /// Starts the game (consumes setup, returns in-progress).
    #[instrument(skip(self))]
    pub fn start(self) -> ExchangeInProgress {
        info!(
            participants = self.roster.len(),
            restrictions = self.restrictions.len(),
            excluded_letters = self.excluded.len(),
            "Draw started"
        );
        ExchangeInProgress {
            pool: self.roster.names().to_vec(),
            letters: LetterPool::new(self.excluded),
            roster: self.roster,
            restrictions: self.restrictions,
            ledger: Vec::new(),
            summary: DrawSummary::default(),
            rng: self.rng,
        }
    }

    /// Runs the whole draw in one pass with a shuffled drawer order.
    ///
    /// Letters are drawn internally, one per participant, exactly as in
    /// turn-by-turn play. Always produces one pairing per participant.
    #[instrument(skip(self), fields(participants = self.roster.len()))]
    pub fn assign_all(mut self) -> ExchangeComplete {
        let mut order = self.roster.names().to_vec();
        order.shuffle(&mut self.rng);

        let mut game = self.start();
        for drawer in &order {
            game.apply_turn(drawer);
        }
        game.seal()
    }
}

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// Draw in progress: participants take turns, one each, in any order.
#[derive(Debug, Clone)]
pub struct ExchangeInProgress {
    roster: Roster,
    restrictions: RestrictionSet,
    letters: LetterPool,
    pool: Vec<String>,
    ledger: Vec<Assignment>,
    summary: DrawSummary,
    rng: ChaCha8Rng,
}

impl ExchangeInProgress {
    /// Draws a letter for `drawer` and assigns them a target.
    ///
    /// Valid once per participant, in any order. Constraint trouble never
    /// errors; it is reported on the returned record instead.
    #[instrument(skip(self))]
    pub fn draw_turn(&mut self, drawer: &str) -> Result<TurnRecord, TurnError> {
        let drawer = drawer.trim();
        if !self.roster.contains(drawer) {
            warn!(drawer, "Unknown drawer");
            return Err(TurnError::UnknownDrawer {
                name: drawer.to_string(),
            });
        }
        if self.has_drawn(drawer) {
            warn!(drawer, "Drawer already took a turn");
            return Err(TurnError::AlreadyDrawn {
                name: drawer.to_string(),
            });
        }
        Ok(self.apply_turn(drawer))
    }

    /// Runs one turn for a drawer known to be valid.
    fn apply_turn(&mut self, drawer: &str) -> TurnRecord {
        let drawn = self.letters.draw(&mut self.rng);
        self.letters.mark_used(drawn.letter);

        let choice = self.choose_target(drawer);

        let assignment = Assignment::new(drawer, choice.target, drawn.letter);
        debug!(%assignment, tier = ?drawn.tier, "Turn recorded");
        self.ledger.push(assignment.clone());

        let record = TurnRecord::new(
            assignment,
            drawn.tier,
            choice.degradation,
            choice.swap_repaired,
        );
        self.summary.record_turn(&record);

        debug_assert!(
            PoolConsistentInvariant::holds(self),
            "{}",
            PoolConsistentInvariant::description()
        );

        record
    }

    fn choose_target(&mut self, drawer: &str) -> TargetChoice {
        let mut candidates: Vec<String> = self
            .pool
            .iter()
            .filter(|t| t.as_str() != drawer && !self.restrictions.forbids(drawer, t.as_str()))
            .cloned()
            .collect();
        candidates.shuffle(&mut self.rng);

        if let Some(target) = candidates.into_iter().next() {
            self.take_from_pool(&target);
            return TargetChoice {
                target,
                degradation: None,
                swap_repaired: false,
            };
        }

        // Hard case: the drawer is the last name left in the pool.
        if self.pool.len() == 1 && self.pool[0] == drawer {
            if let Some(index) = self.swap_partner(drawer) {
                let original = self.ledger[index].retarget(drawer.to_string());
                self.take_from_pool(drawer);
                info!(
                    drawer,
                    partner = %self.ledger[index].drawer(),
                    freed = %original,
                    "Retroactive swap repaired the final turn"
                );
                return TargetChoice {
                    target: original,
                    degradation: None,
                    swap_repaired: true,
                };
            }

            self.take_from_pool(drawer);
            warn!(drawer, "No swap partner available, drawer keeps their own name");
            return TargetChoice {
                target: drawer.to_string(),
                degradation: Some(Degradation::SelfAssignment {
                    drawer: drawer.to_string(),
                }),
                swap_repaired: false,
            };
        }

        // Every remaining non-self target is restricted: override one.
        let mut others: Vec<String> = self
            .pool
            .iter()
            .filter(|t| t.as_str() != drawer)
            .cloned()
            .collect();
        others.shuffle(&mut self.rng);
        let target = others
            .into_iter()
            .next()
            .unwrap_or_else(|| drawer.to_string());
        self.take_from_pool(&target);
        warn!(drawer, target = %target, "Restriction overridden, no unrestricted target remained");
        TargetChoice {
            degradation: Some(Degradation::RestrictionOverridden {
                drawer: drawer.to_string(),
                target: target.clone(),
            }),
            target,
            swap_repaired: false,
        }
    }

    /// Finds an earlier pairing whose target can be given to `drawer`.
    ///
    /// The partner's current target must not be `drawer` or restricted
    /// against them, and the partner must be allowed to receive `drawer`.
    fn swap_partner(&self, drawer: &str) -> Option<usize> {
        self.ledger.iter().position(|prior| {
            prior.target() != drawer
                && prior.drawer() != drawer
                && !self.restrictions.forbids(drawer, prior.target())
                && !self.restrictions.forbids(prior.drawer(), drawer)
        })
    }

    fn take_from_pool(&mut self, name: &str) {
        if let Some(position) = self.pool.iter().position(|n| n == name) {
            self.pool.remove(position);
        }
    }

    /// Pairings recorded so far, in turn order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.ledger
    }

    /// Relaxation counts accumulated so far.
    pub fn summary(&self) -> &DrawSummary {
        &self.summary
    }

    /// The roster this draw runs over.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of turns taken.
    pub fn turns_taken(&self) -> usize {
        self.ledger.len()
    }

    /// Names not yet consumed as a target.
    pub fn targets_remaining(&self) -> usize {
        self.pool.len()
    }

    pub(crate) fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Whether the participant has already taken their turn.
    pub fn has_drawn(&self, name: &str) -> bool {
        self.ledger.iter().any(|a| a.drawer() == name)
    }

    /// Participants who have not drawn yet, in registry order.
    pub fn remaining(&self) -> Vec<&str> {
        self.roster.iter().filter(|n| !self.has_drawn(n)).collect()
    }

    /// The first participant in registry order who has not drawn.
    pub fn next_drawer(&self) -> Option<&str> {
        self.roster.iter().find(|n| !self.has_drawn(n))
    }

    /// Whether every participant has taken their turn.
    pub fn all_drawn(&self) -> bool {
        self.ledger.len() == self.roster.len()
    }

    /// Ends the game if every participant has drawn (consumes self).
    ///
    /// Hands the in-progress draw back unchanged when turns remain.
    #[instrument(skip(self))]
    pub fn finish(self) -> FinishOutcome {
        if self.all_drawn() {
            FinishOutcome::Complete(self.seal())
        } else {
            debug!(
                remaining = self.roster.len() - self.ledger.len(),
                "Turns remain, draw not finished"
            );
            FinishOutcome::Pending(self)
        }
    }

    fn seal(mut self) -> ExchangeComplete {
        self.summary.reconcile(&self.ledger, &self.restrictions);

        info!(
            assignments = self.ledger.len(),
            degraded = self.summary.degraded(),
            "Draw complete"
        );

        let complete = ExchangeComplete {
            excluded: self.letters.excluded().collect(),
            roster: self.roster,
            restrictions: self.restrictions,
            assignments: self.ledger,
            summary: self.summary,
        };

        debug_assert!(
            ExchangeInvariants::check_all(&complete).is_ok(),
            "completed draw violates invariants"
        );

        complete
    }
}

struct TargetChoice {
    target: String,
    degradation: Option<Degradation>,
    swap_repaired: bool,
}

// ─────────────────────────────────────────────────────────────
//  Complete Phase
// ─────────────────────────────────────────────────────────────

/// Finished draw: one pairing per participant, read-only.
#[derive(Debug, Clone)]
pub struct ExchangeComplete {
    roster: Roster,
    restrictions: RestrictionSet,
    excluded: BTreeSet<Letter>,
    assignments: Vec<Assignment>,
    summary: DrawSummary,
}

impl ExchangeComplete {
    /// Pairings in turn order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Relaxation counts for the whole draw.
    pub fn summary(&self) -> &DrawSummary {
        &self.summary
    }

    /// Whether a restriction or the no-self rule had to be relaxed.
    pub fn is_degraded(&self) -> bool {
        self.summary.degraded()
    }

    /// Whether every participant has a pairing.
    pub fn is_complete(&self) -> bool {
        self.assignments.len() == self.roster.len()
    }

    /// The roster the draw ran over.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Restrictions the draw ran under.
    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    /// Excluded letters in alphabetical order.
    pub fn excluded_letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.excluded.iter().copied()
    }

    /// Renders the plain-text result report.
    ///
    /// Stable for a given draw: no timestamps or other live state.
    pub fn report(&self) -> String {
        crate::report::render(self)
    }

    /// Begins a new game over the same roster, restrictions, and exclusions.
    #[instrument(skip(self))]
    pub fn restart(self) -> ExchangeSetup {
        info!("Restarting with the same configuration");
        ExchangeSetup {
            rng: ChaCha8Rng::from_os_rng(),
            roster: self.roster,
            restrictions: self.restrictions,
            excluded: self.excluded,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Transitions & Errors
// ─────────────────────────────────────────────────────────────

/// Result of attempting to finish a draw.
#[derive(Debug)]
pub enum FinishOutcome {
    /// Every participant has drawn; results are final.
    Complete(ExchangeComplete),
    /// Turns remain; the in-progress draw is handed back.
    Pending(ExchangeInProgress),
}

/// Error for an invalid turn request.
///
/// Constraint infeasibility is never an error; these cover caller mistakes
/// only.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TurnError {
    /// The named drawer is not on the roster.
    #[display("unknown drawer: {}", name)]
    UnknownDrawer {
        /// The unrecognized name.
        name: String,
    },

    /// The named drawer has already taken their turn.
    #[display("{} has already drawn", name)]
    AlreadyDrawn {
        /// The repeated drawer.
        name: String,
    },
}
