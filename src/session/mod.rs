//! Session state machine: phases, selection, pair judging, the engine.
//!
//! ## Key Types
//!
//! - `SessionEngine`: Owns the live session and exposes the host API
//! - `GameSession`: Read-only view of one play-through
//! - `Phase`: `Preview -> Playing <-> Resolving -> terminal`
//! - `MatchEvaluator`: Decides match/mismatch and the resolution delay
//! - `Selection` / `IgnoreReason`: What a `select_card` call did
//! - `SessionReport`: Final result handed to the completion callback

pub mod engine;
pub mod evaluator;
pub mod events;
pub mod phase;
pub mod selection;
pub mod state;

pub use engine::SessionEngine;
pub use evaluator::{Evaluation, MatchEvaluator, MatchOutcome, PendingResolution};
pub use events::{SessionEvent, SessionReport};
pub use phase::Phase;
pub use selection::{IgnoreReason, Selection, SelectionBuffer};
pub use state::GameSession;
