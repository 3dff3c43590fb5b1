//! Repeating game clock.
//!
//! The clock owns at most one outstanding `ClockTick` timer. Each accepted
//! tick schedules the next one an interval after its own due time, so a host
//! that pumps late still receives every elapsed tick. `stop` cancels
//! whatever is outstanding. A tick is accepted only if its timer id is the
//! clock's current one, so a tick can never be acted on after `stop`, even
//! with a scheduler that fails to cancel.

use crate::core::ids::{SessionId, TimerId};

use super::scheduler::{Scheduled, Scheduler, TimerEvent};

/// Periodic one-second (by default) timer for the play phase.
#[derive(Clone, Debug)]
pub struct GameClock {
    interval_ms: u64,
    session: Option<SessionId>,
    timer: Option<TimerId>,
}

impl GameClock {
    /// Create a stopped clock.
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            session: None,
            timer: None,
        }
    }

    /// Tick period.
    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Is a tick outstanding?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Session the clock is currently running for.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.session.filter(|_| self.is_running())
    }

    /// Start ticking for `session` from scheduler time `from_ms`, replacing
    /// any previous run. The first tick is due at `from_ms + interval_ms`.
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S, session: SessionId, from_ms: u64) {
        self.stop(scheduler);
        self.session = Some(session);
        self.timer = Some(scheduler.schedule_at(
            from_ms.saturating_add(self.interval_ms),
            session,
            TimerEvent::ClockTick,
        ));
    }

    /// Cancel the outstanding tick.
    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        self.session = None;
    }

    /// Offer a fired timer to the clock.
    ///
    /// Returns true if it is the clock's current tick; the next tick is then
    /// already scheduled. Anything else is refused and leaves the clock
    /// untouched.
    pub fn accept<S: Scheduler>(&mut self, scheduler: &mut S, fired: &Scheduled) -> bool {
        let current = fired.event == TimerEvent::ClockTick
            && self.timer == Some(fired.id)
            && self.session == Some(fired.session);
        if !current {
            return false;
        }

        self.timer = Some(scheduler.schedule_at(
            fired.due_ms.saturating_add(self.interval_ms),
            fired.session,
            TimerEvent::ClockTick,
        ));
        true
    }
}
