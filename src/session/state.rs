//! Session state: the single owned value a play-through mutates.
//!
//! ## GameSession
//!
//! Holds the deck, phase, counters, selection buffer, the pair being
//! judged, and the history. Hosts only ever see it through `&GameSession`
//! (or an owned clone); all mutators are crate-private and driven by
//! `SessionEngine`.
//!
//! ## Invariants
//!
//! - Each symbol appears on exactly two cards
//! - `moves_used <= profile.max_moves`
//! - `score` is a multiple of the engine's points per match
//! - Never `Playing` with `time_remaining_sec == 0`

use im::Vector;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::evaluator::{Evaluation, MatchEvaluator, MatchOutcome, PendingResolution};
use super::events::{SessionEvent, SessionReport};
use super::phase::Phase;
use super::selection::{IgnoreReason, SelectionBuffer};
use crate::cards::{Card, CardId};
use crate::core::config::{Difficulty, DifficultyProfile};
use crate::core::ids::{SessionId, TimerId};

/// What a clock tick did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickEffect {
    /// Not in play; nothing changed.
    Ignored,
    /// Time left after the tick.
    Running,
    /// Clock hit zero during `Playing`.
    Expired,
    /// Clock hit zero while a pair was resolving; the resolution decides.
    ExpiredWhileResolving,
}

/// One play-through.
#[derive(Clone, Debug, Serialize)]
pub struct GameSession {
    id: SessionId,
    profile: DifficultyProfile,
    deck_seed: u64,
    cards: Vec<Card>,
    #[serde(skip)]
    positions: FxHashMap<CardId, usize>,
    phase: Phase,
    moves_used: u32,
    score: u32,
    time_remaining_sec: u32,
    selection: SelectionBuffer,
    pending: Option<PendingResolution>,
    time_expired: bool,
    #[serde(skip)]
    reported: bool,
    history: Vector<SessionEvent>,
}

impl GameSession {
    /// Deal a new session in `Preview` with every card face-up.
    pub(crate) fn new(id: SessionId, profile: DifficultyProfile, mut cards: Vec<Card>, deck_seed: u64) -> Self {
        for card in &mut cards {
            card.face_up = true;
        }
        let positions = cards.iter().enumerate().map(|(i, c)| (c.id, i)).collect();

        let mut history = Vector::new();
        history.push_back(SessionEvent::Started {
            difficulty: profile.level,
            cards: cards.len(),
            deck_seed,
        });

        Self {
            id,
            time_remaining_sec: profile.game_duration_sec,
            profile,
            deck_seed,
            cards,
            positions,
            phase: Phase::Preview,
            moves_used: 0,
            score: 0,
            selection: SelectionBuffer::new(),
            pending: None,
            time_expired: false,
            reported: false,
            history,
        }
    }

    // === Read access ===

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The profile this session was dealt from.
    #[must_use]
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Shorthand for `profile().level`.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.profile.level
    }

    /// Seed of the RNG stream the deck was shuffled with.
    #[must_use]
    pub fn deck_seed(&self) -> u64 {
        self.deck_seed
    }

    /// Cards in board order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.positions.get(&id).map(|&i| &self.cards[i])
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pairs submitted so far.
    #[must_use]
    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    /// Moves left before the budget is spent.
    #[must_use]
    pub fn moves_remaining(&self) -> u32 {
        self.profile.max_moves.saturating_sub(self.moves_used)
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds left on the game clock.
    #[must_use]
    pub fn time_remaining_sec(&self) -> u32 {
        self.time_remaining_sec
    }

    /// Face-up cards awaiting judgement.
    #[must_use]
    pub fn selection(&self) -> &SelectionBuffer {
        &self.selection
    }

    /// The pair currently being judged.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingResolution> {
        self.pending.as_ref()
    }

    /// Everything that happened in this session, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<SessionEvent> {
        &self.history
    }

    /// Number of pairs found.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    /// Is every card matched?
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }

    /// Summary of the session as it stands.
    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport {
            session: self.id,
            difficulty: self.profile.level,
            outcome: self.phase,
            score: self.score,
            moves_used: self.moves_used,
            time_remaining_sec: self.time_remaining_sec,
        }
    }

    // === Transitions (engine only) ===

    /// Preview over: hide every card and start play.
    pub(crate) fn begin_play(&mut self) {
        for card in &mut self.cards {
            card.face_up = false;
        }
        self.phase = Phase::Playing;
        self.history.push_back(SessionEvent::PlayBegan);
    }

    /// Why selecting `id` would be ignored, if it would.
    pub(crate) fn rejection(&self, id: CardId) -> Option<IgnoreReason> {
        match self.phase {
            Phase::Playing => {}
            Phase::Resolving => return Some(IgnoreReason::AwaitingResolution),
            _ => return Some(IgnoreReason::NotPlaying),
        }
        if self.selection.is_full() {
            return Some(IgnoreReason::AwaitingResolution);
        }

        let card = match self.card(id) {
            Some(card) => card,
            None => return Some(IgnoreReason::UnknownCard),
        };
        if card.is_selectable() {
            None
        } else if card.matched {
            Some(IgnoreReason::AlreadyMatched)
        } else {
            Some(IgnoreReason::AlreadyFaceUp)
        }
    }

    /// Turn a card face-up and add it to the selection.
    ///
    /// Callers check `rejection` first.
    pub(crate) fn flip(&mut self, id: CardId) {
        if let Some(&i) = self.positions.get(&id) {
            self.cards[i].face_up = true;
            self.selection.push(id);
            self.history.push_back(SessionEvent::CardFlipped { card: id });
        }
    }

    /// If two cards are selected, count the move, judge them and enter `Resolving`.
    pub(crate) fn submit_pair(&mut self, evaluator: &MatchEvaluator) -> Option<(CardId, CardId, Evaluation)> {
        let (first, second) = self.selection.pair()?;
        let evaluation = evaluator.evaluate(self.card(first)?, self.card(second)?);

        self.moves_used += 1;
        self.phase = Phase::Resolving;
        self.history.push_back(SessionEvent::PairSubmitted {
            first,
            second,
            outcome: evaluation.outcome,
            move_number: self.moves_used,
        });

        Some((first, second, evaluation))
    }

    /// Record the timer that will resolve the submitted pair.
    pub(crate) fn set_pending(&mut self, pending: PendingResolution) {
        self.pending = Some(pending);
    }

    /// Take the pending resolution if `timer` is the one it is waiting for.
    pub(crate) fn take_pending(&mut self, timer: TimerId) -> Option<PendingResolution> {
        match self.pending {
            Some(pending) if pending.timer == timer => self.pending.take(),
            _ => None,
        }
    }

    /// Apply a judged pair and work out where the session goes next.
    ///
    /// Checks run in precedence order: board cleared, clock expired, move
    /// budget spent. A non-terminal result puts the session back in
    /// `Playing`; a terminal one is left for the engine to finish.
    pub(crate) fn apply_resolution(&mut self, pending: &PendingResolution, points_per_match: u32) -> Phase {
        for id in [pending.first, pending.second] {
            if let Some(&i) = self.positions.get(&id) {
                match pending.outcome {
                    MatchOutcome::Match => self.cards[i].matched = true,
                    MatchOutcome::Mismatch => self.cards[i].face_up = false,
                }
            }
        }
        if pending.outcome.is_match() {
            self.score += points_per_match;
        }
        self.selection.clear();
        self.history.push_back(SessionEvent::PairResolved {
            outcome: pending.outcome,
            score: self.score,
        });

        let next = if self.all_matched() {
            Phase::Completed
        } else if self.time_expired {
            Phase::TimedOut
        } else if self.moves_used >= self.profile.max_moves {
            Phase::MovesExhausted
        } else {
            Phase::Playing
        };

        if next == Phase::Playing {
            self.phase = Phase::Playing;
        }
        next
    }

    /// Take one second off the clock.
    pub(crate) fn tick(&mut self) -> TickEffect {
        if !self.phase.is_in_play() || self.time_remaining_sec == 0 {
            return TickEffect::Ignored;
        }

        self.time_remaining_sec -= 1;
        self.history.push_back(SessionEvent::Tick {
            remaining_sec: self.time_remaining_sec,
        });

        if self.time_remaining_sec > 0 {
            TickEffect::Running
        } else if self.phase == Phase::Resolving {
            self.time_expired = true;
            self.history.push_back(SessionEvent::TimeExpiredDuringResolution);
            TickEffect::ExpiredWhileResolving
        } else {
            TickEffect::Expired
        }
    }

    /// Enter a terminal phase.
    ///
    /// Returns the report the first time a session finishes, `None` after.
    pub(crate) fn finish(&mut self, outcome: Phase) -> Option<SessionReport> {
        debug_assert!(outcome.is_terminal());
        if self.reported {
            return None;
        }

        self.phase = outcome;
        self.pending = None;
        self.reported = true;
        self.history.push_back(SessionEvent::Finished {
            outcome,
            score: self.score,
        });
        Some(self.report())
    }
}
