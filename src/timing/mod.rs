//! Time: the injected scheduler and the game clock built on it.
//!
//! Nothing in the engine sleeps or spawns. All delays (preview, clock ticks,
//! pair resolution) are `Scheduled` entries that the host delivers by
//! pumping the engine.

pub mod clock;
pub mod scheduler;

pub use clock::GameClock;
pub use scheduler::{RealtimeScheduler, Scheduled, Scheduler, TimerEvent, TimerQueue, VirtualScheduler};
