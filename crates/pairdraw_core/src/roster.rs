//! Participant registry for a draw.

use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{debug, instrument};

/// Ordered registry of participant names.
///
/// Names are trimmed on entry and must be unique afterwards. Identity is the
/// exact (case-sensitive) string value; order is preserved as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Builds a roster from raw name entries.
    ///
    /// Entries are trimmed and blank entries dropped before validation, so a
    /// trailing empty line in a pasted list is not an error. At least two
    /// names must remain.
    #[instrument(skip(names))]
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = Vec::new();
        for raw in names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if cleaned.iter().any(|n| n == name) {
                return Err(RosterError::DuplicateName {
                    name: name.to_string(),
                });
            }
            cleaned.push(name.to_string());
        }

        if cleaned.len() < 2 {
            return Err(RosterError::TooFewParticipants {
                found: cleaned.len(),
            });
        }

        debug!(count = cleaned.len(), "Roster loaded");
        Ok(Self { names: cleaned })
    }

    /// Participant names in entry order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a roster holds at least two names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the exact name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterates over names in entry order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Error raised while loading participants.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RosterError {
    /// Fewer than two usable names were supplied.
    #[display("at least 2 participants are required, got {}", found)]
    TooFewParticipants {
        /// How many usable names were found.
        found: usize,
    },

    /// The same name was entered twice.
    #[display("duplicate participant name: {}", name)]
    DuplicateName {
        /// The offending name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_drops_blank_entries() {
        let roster = Roster::from_names(["  Alice ", "", "Bob", "   "]).unwrap();
        assert_eq!(roster.names(), ["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_preserves_entry_order() {
        let roster = Roster::from_names(["Carol", "Alice", "Bob"]).unwrap();
        let order: Vec<&str> = roster.iter().collect();
        assert_eq!(order, ["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = Roster::from_names(["Alice", "Bob", " Alice "]).unwrap_err();
        assert_eq!(
            err,
            RosterError::DuplicateName {
                name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_too_few() {
        let err = Roster::from_names(["Alice", "  "]).unwrap_err();
        assert_eq!(err, RosterError::TooFewParticipants { found: 1 });
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let roster = Roster::from_names(["Alice", "Bob"]).unwrap();
        assert!(roster.contains("Alice"));
        assert!(!roster.contains("alice"));
    }
}
