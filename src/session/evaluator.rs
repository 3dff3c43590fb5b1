//! Pair judging.
//!
//! The evaluator decides the outcome at submission time and how long the
//! pair stays visible before the outcome is applied. Applying it is the
//! session's job (see `GameSession::apply_resolution`).

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::config::MatchTiming;
use crate::core::ids::TimerId;

/// Result of judging two cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Match,
    Mismatch,
}

impl MatchOutcome {
    /// Was it a match?
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, MatchOutcome::Match)
    }
}

/// Outcome plus the delay before it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: MatchOutcome,
    pub delay_ms: u64,
}

/// A judged pair waiting for its resolution timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PendingResolution {
    pub first: CardId,
    pub second: CardId,
    pub outcome: MatchOutcome,
    pub timer: TimerId,
}

/// Judges submitted pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchEvaluator {
    timing: MatchTiming,
}

impl MatchEvaluator {
    /// Create an evaluator with the given delays.
    #[must_use]
    pub fn new(timing: MatchTiming) -> Self {
        Self { timing }
    }

    /// The configured delays.
    #[must_use]
    pub fn timing(&self) -> MatchTiming {
        self.timing
    }

    /// Judge a pair of cards.
    #[must_use]
    pub fn evaluate(&self, first: &Card, second: &Card) -> Evaluation {
        let outcome = if first.pairs_with(second) {
            MatchOutcome::Match
        } else {
            MatchOutcome::Mismatch
        };

        Evaluation {
            outcome,
            delay_ms: self.delay_for(outcome),
        }
    }

    /// Resolution delay for an outcome.
    #[must_use]
    pub fn delay_for(&self, outcome: MatchOutcome) -> u64 {
        match outcome {
            MatchOutcome::Match => self.timing.match_delay_ms,
            MatchOutcome::Mismatch => self.timing.mismatch_delay_ms,
        }
    }
}
