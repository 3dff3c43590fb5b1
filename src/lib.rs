//! # memory-match
//!
//! A timed card-matching ("memory") game session engine.
//!
//! ## Design Principles
//!
//! 1. **One owned session**: All mutable game state lives in a single
//!    `GameSession` owned by the engine. Hosts read it, never write it.
//!
//! 2. **Injected time**: Every delay goes through a `Scheduler`. Tests and
//!    replays run on virtual time; real hosts poll a wall-clock scheduler.
//!
//! 3. **Benign input is not an error**: Late or duplicate clicks are
//!    reported as ignored selections. Only out-of-order host calls and bad
//!    configuration produce `GameError`s.
//!
//! ## Modules
//!
//! - `core`: Identifiers, errors, RNG, difficulty and engine configuration
//! - `cards`: Cards, symbol catalog, deck generation
//! - `timing`: Scheduler abstraction and the game clock
//! - `session`: Phases, pair evaluation, session state, the engine
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use memory_match::{Difficulty, EngineConfig, Phase, SessionEngine};
//!
//! let mut engine = SessionEngine::new(EngineConfig::new().with_seed(7)).unwrap();
//! let final_score = Rc::new(Cell::new(None));
//! let sink = Rc::clone(&final_score);
//! engine.on_session_complete(move |report| sink.set(Some(report.score)));
//!
//! engine.start(Difficulty::Easy).unwrap();
//!
//! // Nobody plays: the clock runs out.
//! engine.advance(3_000 + 60_000);
//! assert_eq!(engine.phase(), Some(Phase::TimedOut));
//! assert_eq!(final_score.get(), Some(0));
//! ```

pub mod cards;
pub mod core;
pub mod session;
pub mod timing;

// Re-export commonly used types
pub use crate::core::{
    Difficulty, DifficultyProfile, EngineConfig, GameError, GameRng, MatchTiming, Result, SessionId, TimerId,
};

pub use crate::cards::{generate_deck, Card, CardId, Symbol, SymbolCatalog};

pub use crate::timing::{GameClock, RealtimeScheduler, Scheduled, Scheduler, TimerEvent, VirtualScheduler};

pub use crate::session::{
    GameSession, IgnoreReason, MatchEvaluator, MatchOutcome, Phase, Selection, SessionEngine, SessionEvent,
    SessionReport,
};
