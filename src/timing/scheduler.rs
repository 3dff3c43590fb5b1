//! Deferred-callback abstraction.
//!
//! The engine never touches a wall clock directly. It hands timer events to
//! a `Scheduler` and later drains the ones that are due. Two implementations
//! ship with the crate:
//!
//! - [`VirtualScheduler`]: time moves only when told to. Tests and replay.
//! - [`RealtimeScheduler`]: time is `Instant::elapsed` since creation. For
//!   hosts that poll from their own event loop.
//!
//! Events due at the same instant are delivered in scheduling order.

use std::collections::BTreeMap;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ids::{SessionId, TimerId};

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerEvent {
    /// The preview window is over; play begins.
    PreviewElapsed,
    /// One period of the game clock.
    ClockTick,
    /// The submitted pair's resolution delay is over.
    ResolveSelection,
}

/// A timer entry, tagged with the session that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    /// Handle returned by `schedule`.
    pub id: TimerId,
    /// Session that owns this timer.
    pub session: SessionId,
    /// Scheduler time at which the timer is due.
    pub due_ms: u64,
    /// What to do.
    pub event: TimerEvent,
}

/// Timer source injected into the engine.
pub trait Scheduler {
    /// Current scheduler time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Schedule `event` to fire at scheduler time `due_ms`.
    ///
    /// A due time already in the past is delivered by the next `pop_due`.
    fn schedule_at(&mut self, due_ms: u64, session: SessionId, event: TimerEvent) -> TimerId;

    /// Schedule `event` to fire `delay_ms` from now.
    fn schedule(&mut self, delay_ms: u64, session: SessionId, event: TimerEvent) -> TimerId {
        let due_ms = self.now_ms().saturating_add(delay_ms);
        self.schedule_at(due_ms, session, event)
    }

    /// Cancel a pending timer.
    ///
    /// Returns false if the timer already fired or was never scheduled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Remove and return the earliest timer due at or before `now_ms()`.
    fn pop_due(&mut self) -> Option<Scheduled>;

    /// Due time of the earliest pending timer.
    fn next_due_ms(&self) -> Option<u64>;

    /// Number of pending timers.
    fn pending(&self) -> usize;
}

/// Ordered timer storage shared by the bundled schedulers.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(u64, TimerId), Scheduled>,
    due_by_id: FxHashMap<TimerId, u64>,
    next_id: u64,
}

impl TimerQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timer due at `due_ms`.
    pub fn insert(&mut self, due_ms: u64, session: SessionId, event: TimerEvent) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;

        self.entries.insert(
            (due_ms, id),
            Scheduled {
                id,
                session,
                due_ms,
                event,
            },
        );
        self.due_by_id.insert(id, due_ms);
        id
    }

    /// Remove a timer by id.
    pub fn remove(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due_ms) => self.entries.remove(&(due_ms, id)).is_some(),
            None => false,
        }
    }

    /// Pop the earliest timer if it is due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Scheduled> {
        let (&(due_ms, id), _) = self.entries.first_key_value()?;
        if due_ms > now_ms {
            return None;
        }
        self.due_by_id.remove(&id);
        self.entries.remove(&(due_ms, id))
    }

    /// Due time of the earliest timer.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.keys().next().map(|&(due_ms, _)| due_ms)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a timer is still pending.
    #[must_use]
    pub fn contains(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id)
    }
}

/// Scheduler whose clock only moves when advanced explicitly.
#[derive(Clone, Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    queue: TimerQueue,
}

impl VirtualScheduler {
    /// Create a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward to `ms`. Never moves backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Move time forward by `ms`.
    pub fn advance_by(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Check if a timer is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.contains(id)
    }
}

impl Scheduler for VirtualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_at(&mut self, due_ms: u64, session: SessionId, event: TimerEvent) -> TimerId {
        self.queue.insert(due_ms, session, event)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(id)
    }

    fn pop_due(&mut self) -> Option<Scheduled> {
        self.queue.pop_due(self.now_ms)
    }

    fn next_due_ms(&self) -> Option<u64> {
        self.queue.next_due_ms()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Scheduler driven by the monotonic system clock.
#[derive(Clone, Debug)]
pub struct RealtimeScheduler {
    origin: Instant,
    queue: TimerQueue,
}

impl Default for RealtimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeScheduler {
    /// Create a scheduler whose time zero is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TimerQueue::new(),
        }
    }

    /// Milliseconds until the next timer is due, for hosts that sleep between polls.
    #[must_use]
    pub fn time_until_next_ms(&self) -> Option<u64> {
        self.queue
            .next_due_ms()
            .map(|due_ms| due_ms.saturating_sub(self.now_ms()))
    }
}

impl Scheduler for RealtimeScheduler {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn schedule_at(&mut self, due_ms: u64, session: SessionId, event: TimerEvent) -> TimerId {
        self.queue.insert(due_ms, session, event)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(id)
    }

    fn pop_due(&mut self) -> Option<Scheduled> {
        let now_ms = self.now_ms();
        self.queue.pop_due(now_ms)
    }

    fn next_due_ms(&self) -> Option<u64> {
        self.queue.next_due_ms()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
