//! Letter pool: one uppercase letter per participant.
//!
//! Draws prefer letters nobody has received yet and never hand out an
//! excluded letter while an alternative exists. Exhaustion degrades in two
//! documented steps (repeats allowed, then exclusions ignored); a draw never
//! fails.

use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// An uppercase letter A-Z.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[allow(missing_docs)]
pub enum Letter {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
}

impl Letter {
    /// All 26 letters in alphabetical order.
    pub const ALL: [Letter; 26] = [
        Letter::A, Letter::B, Letter::C, Letter::D, Letter::E, Letter::F,
        Letter::G, Letter::H, Letter::I, Letter::J, Letter::K, Letter::L,
        Letter::M, Letter::N, Letter::O, Letter::P, Letter::Q, Letter::R,
        Letter::S, Letter::T, Letter::U, Letter::V, Letter::W, Letter::X,
        Letter::Y, Letter::Z,
    ];

    /// The uppercase character for this letter.
    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Parses a letter from a character, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Self::ALL.get((upper as u8 - b'A') as usize).copied()
        } else {
            None
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Which fallback stage produced a drawn letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterTier {
    /// Unused and not excluded.
    Fresh,
    /// Every unexcluded letter was already used; repeats allowed.
    Reused,
    /// All 26 letters are excluded; the exclusion list was ignored.
    ExclusionIgnored,
}

/// A dispensed letter plus the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnLetter {
    /// The letter handed out.
    pub letter: Letter,
    /// How constrained the pick was.
    pub tier: LetterTier,
}

/// Pool of letters for one game.
#[derive(Debug, Clone, Default)]
pub struct LetterPool {
    excluded: BTreeSet<Letter>,
    used: BTreeSet<Letter>,
}

impl LetterPool {
    /// Creates a pool with the given exclusions and no letters used.
    pub fn new(excluded: impl IntoIterator<Item = Letter>) -> Self {
        Self {
            excluded: excluded.into_iter().collect(),
            used: BTreeSet::new(),
        }
    }

    /// Draws one letter.
    ///
    /// Picks uniformly among unused, unexcluded letters. Once those run out,
    /// repeats are drawn from the unexcluded letters; if all 26 letters are
    /// excluded, the pick is uniform over the whole alphabet. The pool itself
    /// is not mutated; call [`LetterPool::mark_used`] to record the result.
    #[instrument(skip(self, rng))]
    pub fn draw(&self, rng: &mut ChaCha8Rng) -> DrawnLetter {
        let fresh: Vec<Letter> = Letter::iter()
            .filter(|l| !self.used.contains(l) && !self.excluded.contains(l))
            .collect();
        if let Some(&letter) = fresh.choose(rng) {
            return DrawnLetter {
                letter,
                tier: LetterTier::Fresh,
            };
        }

        let unexcluded: Vec<Letter> = Letter::iter()
            .filter(|l| !self.excluded.contains(l))
            .collect();
        if let Some(&letter) = unexcluded.choose(rng) {
            debug!(%letter, "Unused letters exhausted, repeating");
            return DrawnLetter {
                letter,
                tier: LetterTier::Reused,
            };
        }

        let letter = Letter::ALL.choose(rng).copied().unwrap_or(Letter::A);
        warn!(%letter, "All 26 letters excluded, ignoring exclusions");
        DrawnLetter {
            letter,
            tier: LetterTier::ExclusionIgnored,
        }
    }

    /// Records a letter as dispensed.
    pub fn mark_used(&mut self, letter: Letter) {
        self.used.insert(letter);
    }

    /// Excluded letters in alphabetical order.
    pub fn excluded(&self) -> impl Iterator<Item = Letter> + '_ {
        self.excluded.iter().copied()
    }

    /// Whether the letter is on the exclusion list.
    pub fn is_excluded(&self, letter: Letter) -> bool {
        self.excluded.contains(&letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_letter_char_round_trip() {
        assert_eq!(Letter::A.as_char(), 'A');
        assert_eq!(Letter::Z.as_char(), 'Z');
        assert_eq!(Letter::from_char('q'), Some(Letter::Q));
        assert_eq!(Letter::from_char('!'), None);
    }

    #[test]
    fn test_draw_prefers_fresh_letters() {
        // Everything but Z excluded: the only possible fresh pick is Z.
        let pool = LetterPool::new(Letter::ALL.iter().copied().filter(|l| *l != Letter::Z));
        let mut rng = rng();

        let drawn = pool.draw(&mut rng);
        assert_eq!(drawn.letter, Letter::Z);
        assert_eq!(drawn.tier, LetterTier::Fresh);
    }

    #[test]
    fn test_draw_repeats_when_fresh_exhausted() {
        let mut pool = LetterPool::new(Letter::ALL.iter().copied().filter(|l| *l != Letter::Z));
        let mut rng = rng();

        pool.mark_used(Letter::Z);
        for _ in 0..10 {
            let drawn = pool.draw(&mut rng);
            assert_eq!(drawn.letter, Letter::Z);
            assert_eq!(drawn.tier, LetterTier::Reused);
        }
    }

    #[test]
    fn test_draw_never_excluded_while_alternatives_exist() {
        let excluded: Vec<Letter> = Letter::ALL[..13].to_vec();
        let mut pool = LetterPool::new(excluded.clone());
        let mut rng = rng();

        for _ in 0..100 {
            let drawn = pool.draw(&mut rng);
            assert!(!excluded.contains(&drawn.letter));
            pool.mark_used(drawn.letter);
        }
    }

    #[test]
    fn test_draw_ignores_exclusions_when_all_excluded() {
        let pool = LetterPool::new(Letter::ALL);
        let mut rng = rng();

        let drawn = pool.draw(&mut rng);
        assert_eq!(drawn.tier, LetterTier::ExclusionIgnored);
        assert!(pool.is_excluded(drawn.letter));
    }

    #[test]
    fn test_unique_until_alphabet_exhausted() {
        let mut pool = LetterPool::new([]);
        let mut rng = rng();
        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..26 {
            let drawn = pool.draw(&mut rng);
            assert_eq!(drawn.tier, LetterTier::Fresh);
            assert!(seen.insert(drawn.letter));
            pool.mark_used(drawn.letter);
        }
        assert_eq!(pool.draw(&mut rng).tier, LetterTier::Reused);
    }
}
