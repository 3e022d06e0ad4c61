//! Forbidden-pair bookkeeping.
//!
//! A restriction forbids two participants from drawing each other in either
//! direction. The set keeps insertion order so entries can be removed by the
//! position they were added at.

use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{debug, instrument};

/// An unordered pair of participants forbidden from drawing each other.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[display("{} <-> {}", first, second)]
pub struct Restriction {
    first: String,
    second: String,
}

impl Restriction {
    fn new(first: String, second: String) -> Self {
        Self { first, second }
    }

    /// First name as entered.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Second name as entered.
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Whether this pair forbids `a` and `b` (in either order).
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Insertion-ordered collection of restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestrictionSet {
    entries: Vec<Restriction>,
}

impl RestrictionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the pair {a, b}.
    ///
    /// Names are trimmed first. Fails if the two names are equal or if the
    /// pair is already present in either order.
    #[instrument(skip(self))]
    pub fn add(&mut self, a: &str, b: &str) -> Result<(), RestrictionError> {
        let a = a.trim();
        let b = b.trim();

        if a == b {
            return Err(RestrictionError::SelfRestriction {
                name: a.to_string(),
            });
        }
        if self.forbids(a, b) {
            return Err(RestrictionError::DuplicateRestriction {
                first: a.to_string(),
                second: b.to_string(),
            });
        }

        debug!(first = a, second = b, "Restriction added");
        self.entries.push(Restriction::new(a.to_string(), b.to_string()));
        Ok(())
    }

    /// True iff {a, b} or {b, a} is present.
    pub fn forbids(&self, a: &str, b: &str) -> bool {
        self.entries.iter().any(|r| r.matches(a, b))
    }

    /// Removes the entry at `index` (insertion order).
    ///
    /// Returns the removed pair, or `None` if the index is out of range.
    #[instrument(skip(self))]
    pub fn remove(&mut self, index: usize) -> Option<Restriction> {
        if index < self.entries.len() {
            let removed = self.entries.remove(index);
            debug!(%removed, "Restriction removed");
            Some(removed)
        } else {
            None
        }
    }

    /// Number of restrictions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Restriction] {
        &self.entries
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Restriction> {
        self.entries.iter()
    }
}

/// Error raised when editing the restriction list.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RestrictionError {
    /// Both sides of the pair are the same participant.
    #[display("{} cannot be restricted against themself", name)]
    SelfRestriction {
        /// The repeated name.
        name: String,
    },

    /// The pair is already present (in either order).
    #[display("restriction between {} and {} already exists", first, second)]
    DuplicateRestriction {
        /// First name of the rejected pair.
        first: String,
        /// Second name of the rejected pair.
        second: String,
    },

    /// A name is not on the roster.
    #[display("unknown participant: {}", name)]
    UnknownParticipant {
        /// The unrecognized name.
        name: String,
    },
}
