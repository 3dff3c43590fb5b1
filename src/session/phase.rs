//! Session phases.

use serde::{Deserialize, Serialize};

/// Where a session is in its lifecycle.
///
/// ```text
/// Preview -> Playing <-> Resolving
///               |            |
///               v            v
///     Completed | TimedOut | MovesExhausted
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// All cards shown face-up for memorisation; no input accepted.
    Preview,
    /// Accepting card selections.
    Playing,
    /// A two-card selection is being judged.
    Resolving,
    /// Every pair was found.
    Completed,
    /// The game clock ran out.
    TimedOut,
    /// The move budget was spent with pairs left.
    MovesExhausted,
}

impl Phase {
    /// Terminal phases never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::TimedOut | Phase::MovesExhausted)
    }

    /// Is the game clock supposed to run?
    #[must_use]
    pub const fn is_in_play(self) -> bool {
        matches!(self, Phase::Playing | Phase::Resolving)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Preview => "preview",
            Phase::Playing => "playing",
            Phase::Resolving => "resolving",
            Phase::Completed => "completed",
            Phase::TimedOut => "timed out",
            Phase::MovesExhausted => "moves exhausted",
        };
        f.write_str(name)
    }
}
