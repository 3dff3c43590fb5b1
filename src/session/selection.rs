//! The face-up, not yet judged cards, and what a selection attempt did.

use serde::Serialize;
use smallvec::SmallVec;

use super::evaluator::MatchOutcome;
use crate::cards::CardId;

/// Up to two selected card ids, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectionBuffer {
    cards: SmallVec<[CardId; 2]>,
}

impl SelectionBuffer {
    /// Capacity of the buffer.
    pub const CAPACITY: usize = 2;

    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card. Returns false (and does nothing) when full.
    pub fn push(&mut self, card: CardId) -> bool {
        if self.is_full() {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Both cards, once two are selected.
    #[must_use]
    pub fn pair(&self) -> Option<(CardId, CardId)> {
        match self.cards.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        }
    }

    /// Selected cards in order.
    #[must_use]
    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    /// Number of selected cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Check if two cards are selected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= Self::CAPACITY
    }

    /// Check if a card is selected.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

/// Why a selection was ignored.
///
/// None of these are errors: they all arise naturally from UI latency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IgnoreReason {
    /// Preview is still running or the session is over.
    NotPlaying,
    /// A submitted pair is still being judged.
    AwaitingResolution,
    /// No card with that id in this session's deck.
    UnknownCard,
    /// The card is already part of a found pair.
    AlreadyMatched,
    /// The card is already face-up (typically a double click).
    AlreadyFaceUp,
}

/// What `select_card` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Selection {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The card was turned face-up; one more is needed.
    Flipped,
    /// The card completed a pair, which is now being judged.
    Submitted {
        outcome: MatchOutcome,
        moves_used: u32,
    },
}

impl Selection {
    /// Did the call change the session?
    #[must_use]
    pub fn was_accepted(&self) -> bool {
        !matches!(self, Selection::Ignored(_))
    }
}
