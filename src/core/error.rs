//! Error types for the session engine.
//!
//! Only configuration and protocol mistakes are errors. Input that can
//! legitimately arrive late from a UI (stale card ids, clicks during
//! resolution, anything after the game ended) is reported as an ignored
//! selection instead, see `session::Selection`.

use thiserror::Error;

/// Errors surfaced by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    /// The symbol catalog cannot supply enough distinct symbols.
    #[error("symbol catalog has {available} symbols but {requested} pairs were requested")]
    InsufficientSymbols {
        /// Pairs the difficulty asked for.
        requested: usize,
        /// Distinct symbols in the catalog.
        available: usize,
    },

    /// An operation was called out of order by the host.
    #[error("{operation} called {reason}")]
    IllegalState {
        /// The offending operation.
        operation: &'static str,
        /// Why it was not allowed.
        reason: &'static str,
    },

    /// A difficulty profile violates its invariants.
    #[error("invalid difficulty profile: {0}")]
    InvalidProfile(String),

    /// Engine configuration is inconsistent.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// A difficulty name could not be parsed.
    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}

impl GameError {
    pub(crate) const fn not_started(operation: &'static str) -> Self {
        Self::IllegalState {
            operation,
            reason: "before any session was started",
        }
    }

    /// Whether this error points at a host integration bug rather than bad configuration.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::IllegalState { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;
