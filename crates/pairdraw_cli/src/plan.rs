//! Draw plans loaded from TOML files.

use derive_getters::Getters;
use derive_more::{Display, Error};
use pairdraw_core::{ExchangeSession, Letter, SessionError};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};

/// A declarative draw: who participates, who must not draw whom, and which
/// letters to avoid.
#[derive(Debug, Clone, Getters, Deserialize)]
pub struct DrawPlan {
    /// Participant names in roster order.
    participants: Vec<String>,

    /// Pairs that must not draw each other.
    #[serde(default)]
    restrictions: Vec<[String; 2]>,

    /// Letters the draw should avoid, written as plain text like "QXZ".
    #[serde(default)]
    excluded_letters: String,

    /// Seed for a reproducible draw.
    seed: Option<u64>,
}

impl DrawPlan {
    /// Loads a plan from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        debug!("Loading draw plan");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PlanError::new(format!("Failed to read plan file: {}", e)))?;

        let plan: Self = toml::from_str(&content)
            .map_err(|e| PlanError::new(format!("Failed to parse plan: {}", e)))?;

        info!(participants = plan.participants.len(), "Plan loaded");
        Ok(plan)
    }

    /// Excluded letters parsed leniently: any recognizable letter counts,
    /// everything else (separators, punctuation) is ignored.
    pub fn excluded(&self) -> Vec<Letter> {
        self.excluded_letters
            .chars()
            .filter_map(Letter::from_char)
            .collect()
    }

    /// Builds a session configured with this plan.
    ///
    /// `seed_override` wins over the plan's own seed; with neither, the draw
    /// is seeded from the OS.
    #[instrument(skip(self))]
    pub fn build_session(&self, seed_override: Option<u64>) -> Result<ExchangeSession, SessionError> {
        let session = ExchangeSession::new();
        session.load_participants(&self.participants)?;

        for pair in &self.restrictions {
            session.add_restriction(&pair[0], &pair[1])?;
        }

        let excluded = self.excluded();
        if !excluded.is_empty() {
            session.set_excluded_letters(excluded)?;
        }

        if let Some(seed) = seed_override.or(self.seed) {
            session.set_seed(seed)?;
        }

        Ok(session)
    }
}

/// Draw plan error.
#[derive(Debug, Clone, Display, Error)]
#[display("Plan error: {} at {}:{}", message, file, line)]
pub struct PlanError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PlanError {
    /// Creates a new plan error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
