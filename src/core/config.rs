//! Difficulty and engine configuration.
//!
//! - `Difficulty`: the level a host asks for
//! - `DifficultyProfile`: the fixed parameters behind a level
//! - `MatchTiming`: how long a judged pair stays visible
//! - `EngineConfig`: everything else, built once per engine

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use crate::cards::SymbolCatalog;

/// Difficulty level requested by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The fixed profile for this level.
    #[must_use]
    pub fn profile(self) -> DifficultyProfile {
        DifficultyProfile::for_level(self)
    }

    /// Lowercase name, as accepted by `FromStr`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}

/// Parameters of one difficulty level. Never mutated by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Level this profile belongs to (reported back to the host).
    pub level: Difficulty,

    /// Number of symbol pairs; the deck holds twice as many cards.
    pub pair_count: usize,

    /// How long every card is shown face-up before play starts.
    pub preview_duration_ms: u64,

    /// Seconds on the game clock once play starts.
    pub game_duration_sec: u32,

    /// Pair submissions allowed before the session is over.
    pub max_moves: u32,
}

impl DifficultyProfile {
    /// The built-in profile for a level.
    ///
    /// | level  | pairs | preview | clock | moves |
    /// |--------|-------|---------|-------|-------|
    /// | easy   | 6     | 3000 ms | 60 s  | 15    |
    /// | medium | 8     | 4000 ms | 90 s  | 20    |
    /// | hard   | 10    | 5000 ms | 120 s | 25    |
    #[must_use]
    pub fn for_level(level: Difficulty) -> Self {
        let (pair_count, preview_duration_ms, game_duration_sec, max_moves) = match level {
            Difficulty::Easy => (6, 3_000, 60, 15),
            Difficulty::Medium => (8, 4_000, 90, 20),
            Difficulty::Hard => (10, 5_000, 120, 25),
        };

        Self {
            level,
            pair_count,
            preview_duration_ms,
            game_duration_sec,
            max_moves,
        }
    }

    /// Override the pair count.
    #[must_use]
    pub fn with_pair_count(mut self, pairs: usize) -> Self {
        self.pair_count = pairs;
        self
    }

    /// Override the preview duration.
    #[must_use]
    pub fn with_preview_ms(mut self, ms: u64) -> Self {
        self.preview_duration_ms = ms;
        self
    }

    /// Override the game clock.
    #[must_use]
    pub fn with_game_duration_sec(mut self, secs: u32) -> Self {
        self.game_duration_sec = secs;
        self
    }

    /// Override the move budget.
    #[must_use]
    pub fn with_max_moves(mut self, moves: u32) -> Self {
        self.max_moves = moves;
        self
    }

    /// Number of cards in a deck built from this profile.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }

    /// Check the profile invariants.
    pub fn validate(&self) -> Result<()> {
        if self.pair_count == 0 {
            return Err(GameError::InvalidProfile("pair_count must be at least 1".into()));
        }
        if self.preview_duration_ms == 0 {
            return Err(GameError::InvalidProfile("preview_duration_ms must be positive".into()));
        }
        if self.game_duration_sec == 0 {
            return Err(GameError::InvalidProfile("game_duration_sec must be positive".into()));
        }
        if self.max_moves == 0 {
            return Err(GameError::InvalidProfile("max_moves must be at least 1".into()));
        }
        Ok(())
    }
}

/// Resolution delays for judged pairs.
///
/// A mismatch stays visible at least as long as a match so the player can
/// memorise both cards before they flip back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTiming {
    /// Delay before a matched pair is marked matched.
    pub match_delay_ms: u64,

    /// Delay before a mismatched pair flips back face-down.
    pub mismatch_delay_ms: u64,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self {
            match_delay_ms: 500,
            mismatch_delay_ms: 800,
        }
    }
}

impl MatchTiming {
    /// Create timing with explicit delays.
    #[must_use]
    pub const fn new(match_delay_ms: u64, mismatch_delay_ms: u64) -> Self {
        Self {
            match_delay_ms,
            mismatch_delay_ms,
        }
    }

    /// Both delays nonzero, mismatch no shorter than match.
    pub fn validate(&self) -> Result<()> {
        if self.match_delay_ms == 0 || self.mismatch_delay_ms == 0 {
            return Err(GameError::InvalidConfig("resolution delays must be nonzero".into()));
        }
        if self.mismatch_delay_ms < self.match_delay_ms {
            return Err(GameError::InvalidConfig(format!(
                "mismatch delay ({} ms) is shorter than match delay ({} ms)",
                self.mismatch_delay_ms, self.match_delay_ms
            )));
        }
        Ok(())
    }
}

/// Engine-wide configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Score awarded for each matched pair.
    pub points_per_match: u32,

    /// Resolution delays.
    pub timing: MatchTiming,

    /// Game clock period. One tick removes one second from the clock.
    pub tick_interval_ms: u64,

    /// RNG seed. `None` seeds from entropy when the engine is built.
    pub seed: Option<u64>,

    /// Symbols decks are drawn from.
    pub catalog: SymbolCatalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            points_per_match: 10,
            timing: MatchTiming::default(),
            tick_interval_ms: 1_000,
            seed: None,
            catalog: SymbolCatalog::default(),
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the points per match.
    #[must_use]
    pub fn with_points_per_match(mut self, points: u32) -> Self {
        self.points_per_match = points;
        self
    }

    /// Set the resolution delays.
    #[must_use]
    pub fn with_timing(mut self, timing: MatchTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Set the clock period.
    #[must_use]
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Fix the RNG seed for reproducible decks.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use a custom symbol catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: SymbolCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Check the configuration.
    ///
    /// Catalog size is checked per session in `start`, since it depends on
    /// the requested difficulty.
    pub fn validate(&self) -> Result<()> {
        if self.points_per_match == 0 {
            return Err(GameError::InvalidConfig("points_per_match must be positive".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig("tick_interval_ms must be positive".into()));
        }
        self.timing.validate()
    }
}
