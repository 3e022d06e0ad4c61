//! Pairdraw library - gift-exchange draws with typed phases
//!
//! This library assigns every participant of a gift exchange another
//! participant to give to, plus a letter to theme the gift, honoring
//! restrictions between participants wherever the pool allows.
//!
//! # Architecture
//!
//! - **Roster**: Validated participant list (trimmed, non-empty, unique)
//! - **Restrictions**: Symmetric forbidden pairs between participants
//! - **Letters**: Themed letter draw with exclusions and reuse tiers
//! - **Engine**: Draw phases (setup, in progress, complete) and the
//!   assignment algorithm
//! - **Session**: Thread-safe facade hiding the phase transitions
//! - **Invariants**: First-class checks on what the engine produces
//!
//! # Example
//!
//! ```
//! use pairdraw_core::{ExchangeSetup, Roster};
//!
//! # fn example() -> Result<(), pairdraw_core::RosterError> {
//! let roster = Roster::from_names(["Alice", "Bob", "Carol"])?;
//! let complete = ExchangeSetup::new(roster).with_seed(7).assign_all();
//!
//! assert!(complete.is_complete());
//! assert_eq!(complete.assignments().len(), 3);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod assignment;
mod engine;
mod letters;
mod report;
mod restriction;
mod roster;
mod session;

// Public module declarations
pub mod invariants;

// Crate-level exports - Roster
pub use roster::{Roster, RosterError};

// Crate-level exports - Restrictions
pub use restriction::{Restriction, RestrictionError, RestrictionSet};

// Crate-level exports - Letter draw
pub use letters::{DrawnLetter, Letter, LetterPool, LetterTier};

// Crate-level exports - Pairings and accounting
pub use assignment::{Assignment, Degradation, DrawSummary, TurnRecord};

// Crate-level exports - Draw phases
pub use engine::{
    ExchangeComplete, ExchangeInProgress, ExchangeSetup, FinishOutcome, TurnError,
};

// Crate-level exports - Session facade
pub use session::{BatchOutcome, ExchangeSession, Phase, SessionError};
