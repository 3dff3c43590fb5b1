//! Core engine types: identifiers, errors, RNG, configuration.
//!
//! Everything here is independent of how a session is played; the game
//! modules build on these types.

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;

pub use config::{Difficulty, DifficultyProfile, EngineConfig, MatchTiming};
pub use error::{GameError, Result};
pub use ids::{SessionId, TimerId};
pub use rng::GameRng;
