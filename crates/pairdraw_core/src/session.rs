//! Synchronized session facade over the draw phases.
//!
//! [`ExchangeSession`] hides the phase types behind one thread-safe handle so
//! callers never juggle consuming transitions themselves. Every operation
//! locks the session, checks the phase, and either acts or reports which
//! phase the operation needed.

use crate::assignment::{Assignment, DrawSummary, TurnRecord};
use crate::engine::{
    ExchangeComplete, ExchangeInProgress, ExchangeSetup, FinishOutcome, TurnError,
};
use crate::letters::Letter;
use crate::restriction::{Restriction, RestrictionError};
use crate::roster::{Roster, RosterError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No draw is running; participants and rules may be edited.
    NotStarted,
    /// Turns are being taken.
    InProgress,
    /// Every participant has drawn; results are available.
    AllDrawn,
}

#[derive(Debug)]
enum SessionState {
    Empty,
    Setup(ExchangeSetup),
    Running(ExchangeInProgress),
    Done(ExchangeComplete),
}

/// Thread-safe handle on a single draw.
///
/// Clones share the same underlying session.
#[derive(Debug, Clone)]
pub struct ExchangeSession {
    state: Arc<Mutex<SessionState>>,
}

impl ExchangeSession {
    /// Creates an empty session with no participants.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating draw session");
        Self {
            state: Arc::new(Mutex::new(SessionState::Empty)),
        }
    }

    /// Loads a fresh roster, discarding any draw in progress or finished.
    #[instrument(skip(self, names))]
    pub fn load_participants<I, S>(&self, names: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roster = Roster::from_names(names)?;
        let mut state = self.state.lock().unwrap();

        info!(participants = roster.len(), "Participants loaded, session reset");
        *state = SessionState::Setup(ExchangeSetup::new(roster));
        Ok(())
    }

    /// Seeds the random source for a reproducible draw. Setup phase only.
    #[instrument(skip(self))]
    pub fn set_seed(&self, seed: u64) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, SessionState::Empty) {
            SessionState::Setup(setup) => {
                *state = SessionState::Setup(setup.with_seed(seed));
                debug!(seed, "Draw seeded");
                Ok(())
            }
            SessionState::Empty => Err(SessionError::NoRoster),
            other @ SessionState::Running(_) => {
                *state = other;
                Err(SessionError::AlreadyStarted)
            }
            other @ SessionState::Done(_) => {
                *state = other;
                Err(SessionError::Finished)
            }
        }
    }

    /// Forbids a pair of participants from drawing each other.
    #[instrument(skip(self))]
    pub fn add_restriction(&self, a: &str, b: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        match &mut *state {
            SessionState::Setup(setup) => {
                setup.add_restriction(a, b)?;
                Ok(())
            }
            SessionState::Empty => Err(SessionError::NoRoster),
            SessionState::Running(_) => Err(SessionError::AlreadyStarted),
            SessionState::Done(_) => Err(SessionError::Finished),
        }
    }

    /// Removes a restriction by its insertion index.
    #[instrument(skip(self))]
    pub fn remove_restriction(&self, index: usize) -> Result<Restriction, SessionError> {
        let mut state = self.state.lock().unwrap();
        match &mut *state {
            SessionState::Setup(setup) => setup
                .remove_restriction(index)
                .ok_or(SessionError::NoSuchRestriction { index }),
            SessionState::Empty => Err(SessionError::NoRoster),
            SessionState::Running(_) => Err(SessionError::AlreadyStarted),
            SessionState::Done(_) => Err(SessionError::Finished),
        }
    }

    /// Replaces the set of letters the letter draw should avoid.
    #[instrument(skip(self, letters))]
    pub fn set_excluded_letters(
        &self,
        letters: impl IntoIterator<Item = Letter>,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        match &mut *state {
            SessionState::Setup(setup) => {
                setup.set_excluded_letters(letters);
                Ok(())
            }
            SessionState::Empty => Err(SessionError::NoRoster),
            SessionState::Running(_) => Err(SessionError::AlreadyStarted),
            SessionState::Done(_) => Err(SessionError::Finished),
        }
    }

    /// Starts turn-by-turn play.
    ///
    /// A finished session restarts over the same roster, restrictions, and
    /// letter exclusions.
    #[instrument(skip(self))]
    pub fn start_game(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, SessionState::Empty) {
            SessionState::Setup(setup) => {
                *state = SessionState::Running(setup.start());
                Ok(())
            }
            SessionState::Done(complete) => {
                info!("Restarting a finished draw");
                *state = SessionState::Running(complete.restart().start());
                Ok(())
            }
            SessionState::Empty => {
                warn!("Cannot start, no participants loaded");
                Err(SessionError::NoRoster)
            }
            other @ SessionState::Running(_) => {
                *state = other;
                warn!("Draw already started");
                Err(SessionError::AlreadyStarted)
            }
        }
    }

    /// Draws a letter for `drawer` and assigns them a target.
    ///
    /// When the last participant draws, the session moves to
    /// [`Phase::AllDrawn`] and results become available.
    #[instrument(skip(self))]
    pub fn draw_letter_and_assign(&self, drawer: &str) -> Result<TurnRecord, SessionError> {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, SessionState::Empty) {
            SessionState::Running(mut game) => match game.draw_turn(drawer) {
                Ok(record) => {
                    if game.all_drawn() {
                        match game.finish() {
                            FinishOutcome::Complete(complete) => {
                                *state = SessionState::Done(complete);
                            }
                            FinishOutcome::Pending(pending) => {
                                *state = SessionState::Running(pending);
                            }
                        }
                    } else {
                        *state = SessionState::Running(game);
                    }
                    Ok(record)
                }
                Err(error) => {
                    *state = SessionState::Running(game);
                    Err(SessionError::from(error))
                }
            },
            SessionState::Empty => Err(SessionError::NoRoster),
            other @ SessionState::Setup(_) => {
                *state = other;
                Err(SessionError::NotStarted)
            }
            other @ SessionState::Done(_) => {
                *state = other;
                Err(SessionError::Finished)
            }
        }
    }

    /// Runs the whole draw at once. Setup phase only.
    #[instrument(skip(self))]
    pub fn compute_batch_assignment(&self) -> Result<BatchOutcome, SessionError> {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, SessionState::Empty) {
            SessionState::Setup(setup) => {
                let complete = setup.assign_all();
                let outcome = BatchOutcome {
                    assignments: complete.assignments().to_vec(),
                    summary: *complete.summary(),
                };
                *state = SessionState::Done(complete);
                Ok(outcome)
            }
            SessionState::Empty => Err(SessionError::NoRoster),
            other @ SessionState::Running(_) => {
                *state = other;
                Err(SessionError::AlreadyStarted)
            }
            other @ SessionState::Done(_) => {
                *state = other;
                Err(SessionError::Finished)
            }
        }
    }

    /// Renders the plain-text result report of a finished draw.
    #[instrument(skip(self))]
    pub fn export_results(&self) -> Result<String, SessionError> {
        let state = self.state.lock().unwrap();
        match &*state {
            SessionState::Done(complete) => Ok(complete.report()),
            SessionState::Empty => Err(SessionError::NoRoster),
            SessionState::Setup(_) | SessionState::Running(_) => Err(SessionError::NotFinished),
        }
    }

    /// Final pairings of a finished draw, in turn order.
    pub fn results(&self) -> Result<Vec<Assignment>, SessionError> {
        let state = self.state.lock().unwrap();
        match &*state {
            SessionState::Done(complete) => Ok(complete.assignments().to_vec()),
            SessionState::Empty => Err(SessionError::NoRoster),
            SessionState::Setup(_) | SessionState::Running(_) => Err(SessionError::NotFinished),
        }
    }

    /// Relaxation counts of a finished draw.
    pub fn summary(&self) -> Result<DrawSummary, SessionError> {
        let state = self.state.lock().unwrap();
        match &*state {
            SessionState::Done(complete) => Ok(*complete.summary()),
            SessionState::Empty => Err(SessionError::NoRoster),
            SessionState::Setup(_) | SessionState::Running(_) => Err(SessionError::NotFinished),
        }
    }

    /// Where the session currently stands.
    pub fn phase(&self) -> Phase {
        match &*self.state.lock().unwrap() {
            SessionState::Empty | SessionState::Setup(_) => Phase::NotStarted,
            SessionState::Running(_) => Phase::InProgress,
            SessionState::Done(_) => Phase::AllDrawn,
        }
    }

    /// Whether results are available.
    pub fn is_complete(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), SessionState::Done(_))
    }

    /// The next participant in registry order who has not drawn.
    pub fn next_drawer(&self) -> Option<String> {
        match &*self.state.lock().unwrap() {
            SessionState::Running(game) => game.next_drawer().map(String::from),
            _ => None,
        }
    }

    /// Participants who have not drawn yet, in registry order.
    pub fn remaining(&self) -> Vec<String> {
        match &*self.state.lock().unwrap() {
            SessionState::Running(game) => {
                game.remaining().into_iter().map(String::from).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl Default for ExchangeSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a batch draw: the pairings plus their relaxation counts.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Pairings in the order they were assigned.
    assignments: Vec<Assignment>,
    /// Relaxation counts for the whole draw.
    summary: DrawSummary,
}

impl BatchOutcome {
    /// Whether a restriction or the no-self rule had to be relaxed.
    pub fn degraded(&self) -> bool {
        self.summary.degraded()
    }
}

/// Error from a session operation requested in the wrong phase or with bad
/// input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// No participants have been loaded yet.
    #[display("no participants loaded")]
    NoRoster,

    /// The draw has started; setup edits and batch runs are closed.
    #[display("the draw has already started")]
    AlreadyStarted,

    /// The draw has not started; turns cannot be taken.
    #[display("the draw has not started")]
    NotStarted,

    /// The draw is not finished; results are not available yet.
    #[display("the draw is not finished")]
    NotFinished,

    /// The draw has finished; only export, queries, and restart remain.
    #[display("the draw is already finished")]
    Finished,

    /// No restriction exists at the given index.
    #[display("no restriction at index {}", index)]
    NoSuchRestriction {
        /// The out-of-range index.
        index: usize,
    },

    /// The roster could not be built.
    #[display("{}", _0)]
    Roster(RosterError),

    /// A restriction could not be added.
    #[display("{}", _0)]
    Restriction(RestrictionError),

    /// A turn could not be taken.
    #[display("{}", _0)]
    Turn(TurnError),
}

impl std::error::Error for SessionError {}

impl From<RosterError> for SessionError {
    fn from(err: RosterError) -> Self {
        Self::Roster(err)
    }
}

impl From<RestrictionError> for SessionError {
    fn from(err: RestrictionError) -> Self {
        Self::Restriction(err)
    }
}

impl From<TurnError> for SessionError {
    fn from(err: TurnError) -> Self {
        Self::Turn(err)
    }
}
