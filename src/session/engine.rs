//! The session state machine.
//!
//! `SessionEngine` owns the live `GameSession`, the scheduler, the game
//! clock and the RNG. Hosts talk to it through three operations (`start`,
//! `select_card`, `tick`) plus `pump`/`advance` to deliver due timers, and
//! read state through `session()`.
//!
//! ## Timers
//!
//! Every timer is tagged with the `SessionId` that scheduled it. Restarting
//! cancels the previous session's timers, and any that still reach the
//! engine (a scheduler that could not cancel, a host replaying events) are
//! discarded because their tag no longer matches.
//!
//! ## Example
//!
//! ```
//! use memory_match::core::{Difficulty, EngineConfig};
//! use memory_match::session::{Phase, SessionEngine};
//!
//! let mut engine = SessionEngine::new(EngineConfig::new().with_seed(1)).unwrap();
//! let preview_ms = Difficulty::Easy.profile().preview_duration_ms;
//!
//! engine.start(Difficulty::Easy).unwrap();
//! assert_eq!(engine.phase(), Some(Phase::Preview));
//!
//! engine.advance(preview_ms);
//! assert_eq!(engine.phase(), Some(Phase::Playing));
//! ```

use tracing::{debug, info, trace};

use super::evaluator::{MatchEvaluator, PendingResolution};
use super::events::SessionReport;
use super::phase::Phase;
use super::selection::Selection;
use super::state::{GameSession, TickEffect};
use crate::cards::{check_deck_request, generate_deck, CardId};
use crate::core::config::{Difficulty, DifficultyProfile, EngineConfig};
use crate::core::error::{GameError, Result};
use crate::core::ids::{SessionId, TimerId};
use crate::core::rng::GameRng;
use crate::timing::{GameClock, Scheduled, Scheduler, TimerEvent, VirtualScheduler};

type CompletionCallback = Box<dyn FnMut(&SessionReport)>;

/// Drives memory-game sessions.
pub struct SessionEngine<S: Scheduler = VirtualScheduler> {
    config: EngineConfig,
    evaluator: MatchEvaluator,
    scheduler: S,
    clock: GameClock,
    rng: GameRng,
    session: Option<GameSession>,
    last_session: SessionId,
    preview_timer: Option<TimerId>,
    on_complete: Option<CompletionCallback>,
}

impl SessionEngine<VirtualScheduler> {
    /// Create an engine on a virtual clock starting at zero.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_scheduler(config, VirtualScheduler::new())
    }

    /// Move virtual time forward by `elapsed_ms`, delivering every timer
    /// that falls due on the way at its own due time.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(elapsed_ms);

        while let Some(due_ms) = self.scheduler.next_due_ms() {
            if due_ms > target {
                break;
            }
            self.scheduler.advance_to(due_ms);
            self.pump();
        }

        self.scheduler.advance_to(target);
    }
}

impl<S: Scheduler> SessionEngine<S> {
    /// Create an engine on a host-provided scheduler.
    pub fn with_scheduler(config: EngineConfig, scheduler: S) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        Ok(Self {
            evaluator: MatchEvaluator::new(config.timing),
            clock: GameClock::new(config.tick_interval_ms),
            config,
            scheduler,
            rng,
            session: None,
            last_session: SessionId::default(),
            preview_timer: None,
            on_complete: None,
        })
    }

    /// Register the completion callback.
    ///
    /// Called exactly once per session, with the final report, when the
    /// session reaches `Completed`, `TimedOut` or `MovesExhausted`.
    /// Replaces any previous callback.
    pub fn on_session_complete<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionReport) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    // === Read access ===

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The live session, if one was started.
    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Phase of the live session.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(GameSession::phase)
    }

    /// The injected scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler, for hosts that drive time themselves.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Is the game clock currently running?
    #[must_use]
    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Final score of a finished session.
    pub fn final_score(&self) -> Result<u32> {
        let session = self.session.as_ref().ok_or(GameError::not_started("final_score"))?;
        if !session.phase().is_terminal() {
            return Err(GameError::IllegalState {
                operation: "final_score",
                reason: "before the session reached a terminal phase",
            });
        }
        Ok(session.score())
    }

    // === Operations ===

    /// Start a new session at a built-in difficulty.
    pub fn start(&mut self, difficulty: Difficulty) -> Result<&GameSession> {
        self.start_with_profile(difficulty.profile())
    }

    /// Start a new session from an explicit profile.
    ///
    /// Any previous session is abandoned: its timers are cancelled and it
    /// will not report completion.
    pub fn start_with_profile(&mut self, profile: DifficultyProfile) -> Result<&GameSession> {
        // A rejected start must not consume a fork
        check_deck_request(&profile, &self.config.catalog)?;
        let mut deck_rng = self.rng.fork();
        let cards = generate_deck(&profile, &self.config.catalog, &mut deck_rng)?;

        self.retire_current();

        let id = self.last_session.next();
        self.last_session = id;

        debug!(
            session = %id,
            difficulty = %profile.level,
            cards = cards.len(),
            deck_seed = deck_rng.seed(),
            "session started"
        );

        self.preview_timer = Some(self.scheduler.schedule(profile.preview_duration_ms, id, TimerEvent::PreviewElapsed));
        Ok(&*self.session.insert(GameSession::new(id, profile, cards, deck_rng.seed())))
    }

    /// Select a card.
    ///
    /// Out-of-phase and stale input is ignored, never an error; see
    /// `IgnoreReason`. The second card of a pair counts a move and
    /// schedules its resolution.
    pub fn select_card(&mut self, card: CardId) -> Result<Selection> {
        let session = self.session.as_mut().ok_or(GameError::not_started("select_card"))?;

        if let Some(reason) = session.rejection(card) {
            trace!(session = %session.id(), %card, ?reason, "selection ignored");
            return Ok(Selection::Ignored(reason));
        }

        session.flip(card);
        let Some((first, second, evaluation)) = session.submit_pair(&self.evaluator) else {
            return Ok(Selection::Flipped);
        };

        let timer = self
            .scheduler
            .schedule(evaluation.delay_ms, session.id(), TimerEvent::ResolveSelection);
        session.set_pending(PendingResolution {
            first,
            second,
            outcome: evaluation.outcome,
            timer,
        });

        debug!(
            session = %session.id(),
            %first,
            %second,
            outcome = ?evaluation.outcome,
            moves_used = session.moves_used(),
            "pair submitted"
        );

        Ok(Selection::Submitted {
            outcome: evaluation.outcome,
            moves_used: session.moves_used(),
        })
    }

    /// Take one second off the game clock.
    ///
    /// The engine's own clock calls this; hosts may call it too. Outside of
    /// play it does nothing.
    pub fn tick(&mut self) -> Result<()> {
        if self.session.is_none() {
            return Err(GameError::not_started("tick"));
        }
        self.apply_tick();
        Ok(())
    }

    /// Deliver every timer that is due now. Returns how many were delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(fired) = self.scheduler.pop_due() {
            self.dispatch(fired);
            delivered += 1;
        }
        delivered
    }

    // === Internals ===

    fn dispatch(&mut self, fired: Scheduled) {
        let live = self.session.as_ref().map(GameSession::id);
        if live != Some(fired.session) {
            debug!(timer = %fired.id, owner = %fired.session, event = ?fired.event, "discarding stale timer");
            return;
        }

        match fired.event {
            TimerEvent::PreviewElapsed => self.end_preview(&fired),
            TimerEvent::ClockTick => {
                if self.clock.accept(&mut self.scheduler, &fired) {
                    self.apply_tick();
                } else {
                    trace!(timer = %fired.id, "clock refused tick");
                }
            }
            TimerEvent::ResolveSelection => self.resolve(fired.id),
        }
    }

    fn end_preview(&mut self, fired: &Scheduled) {
        if self.preview_timer != Some(fired.id) {
            return;
        }
        self.preview_timer = None;

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase() != Phase::Preview {
            return;
        }

        session.begin_play();
        // Play starts when the preview was due, not when it was delivered
        self.clock.start(&mut self.scheduler, session.id(), fired.due_ms);
        debug!(session = %session.id(), time_remaining_sec = session.time_remaining_sec(), "play began");
    }

    fn apply_tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.tick() {
            TickEffect::Ignored => {}
            TickEffect::Running => {
                trace!(session = %session.id(), remaining = session.time_remaining_sec(), "tick");
            }
            TickEffect::ExpiredWhileResolving => {
                debug!(session = %session.id(), "clock expired during resolution");
                self.clock.stop(&mut self.scheduler);
            }
            TickEffect::Expired => self.finish(Phase::TimedOut),
        }
    }

    fn resolve(&mut self, timer: TimerId) {
        let points = self.config.points_per_match;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(pending) = session.take_pending(timer) else {
            trace!(timer = %timer, "no pending pair for resolution timer");
            return;
        };

        let next = session.apply_resolution(&pending, points);
        debug!(
            session = %session.id(),
            outcome = ?pending.outcome,
            score = session.score(),
            next = %next,
            "pair resolved"
        );

        if next.is_terminal() {
            self.finish(next);
        }
    }

    /// Stop all timers and move the live session into `outcome`.
    fn finish(&mut self, outcome: Phase) {
        self.cancel_timers();

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(report) = session.finish(outcome) else {
            return;
        };

        info!(
            session = %report.session,
            difficulty = %report.difficulty,
            outcome = %report.outcome,
            score = report.score,
            moves_used = report.moves_used,
            time_remaining_sec = report.time_remaining_sec,
            "session finished"
        );

        if let Some(callback) = self.on_complete.as_mut() {
            callback(&report);
        }
    }

    /// Cancel the live session's timers and drop it.
    fn retire_current(&mut self) {
        self.cancel_timers();
        if let Some(old) = self.session.take() {
            if !old.phase().is_terminal() {
                debug!(session = %old.id(), phase = %old.phase(), "abandoning unfinished session");
            }
        }
    }

    fn cancel_timers(&mut self) {
        self.clock.stop(&mut self.scheduler);
        if let Some(timer) = self.preview_timer.take() {
            self.scheduler.cancel(timer);
        }
        if let Some(pending) = self.session.as_ref().and_then(GameSession::pending) {
            self.scheduler.cancel(pending.timer);
        }
    }
}
