//! Session history and the completion report.
//!
//! Every state change a session goes through is appended to its history as
//! a `SessionEvent`. The history is an `im::Vector`, so cloning a session
//! snapshot shares it instead of copying.

use serde::Serialize;

use super::evaluator::MatchOutcome;
use super::phase::Phase;
use crate::cards::CardId;
use crate::core::config::Difficulty;
use crate::core::ids::SessionId;

/// One entry in a session's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    /// Deck dealt, preview running.
    Started { difficulty: Difficulty, cards: usize, deck_seed: u64 },
    /// Preview over, clock running.
    PlayBegan,
    /// A card was turned face-up by the player.
    CardFlipped { card: CardId },
    /// Two cards were submitted; counts as one move.
    PairSubmitted {
        first: CardId,
        second: CardId,
        outcome: MatchOutcome,
        move_number: u32,
    },
    /// The submitted pair's outcome was applied.
    PairResolved { outcome: MatchOutcome, score: u32 },
    /// One second came off the clock.
    Tick { remaining_sec: u32 },
    /// The clock hit zero while a pair was still resolving.
    TimeExpiredDuringResolution,
    /// Terminal phase reached.
    Finished { outcome: Phase, score: u32 },
}

/// Summary handed to the completion callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub session: SessionId,
    pub difficulty: Difficulty,
    /// The terminal phase.
    pub outcome: Phase,
    /// Final score.
    pub score: u32,
    pub moves_used: u32,
    pub time_remaining_sec: u32,
}

impl SessionReport {
    /// Did the player clear the board?
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.outcome == Phase::Completed
    }
}
