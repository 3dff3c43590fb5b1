//! Symbol catalog that decks are drawn from.
//!
//! The catalog is an ordered list of distinct symbols. Decks take symbols
//! from the front, so the order decides which symbols appear at each
//! difficulty.
//!
//! ```
//! use memory_match::cards::SymbolCatalog;
//!
//! let catalog = SymbolCatalog::from_symbols(["A", "B", "C"]).unwrap();
//! assert_eq!(catalog.len(), 3);
//! assert_eq!(catalog.take(2).len(), 2);
//!
//! assert!(SymbolCatalog::from_symbols(["A", "A"]).is_err());
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::Symbol;
use crate::core::error::{GameError, Result};

/// Symbols of the default catalog, in draw order.
pub const DEFAULT_SYMBOLS: [&str; 12] = [
    "🍎", "🍌", "🍇", "🍓", "🍒", "🍍", "🥝", "🍑", "🍉", "🍋", "🥥", "🍐",
];

/// Ordered collection of distinct symbols.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| Symbol::new(*s)).collect(),
        }
    }
}

impl SymbolCatalog {
    /// Build a catalog from symbols.
    ///
    /// Fails on an empty list, blank symbols, or duplicates.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<Symbol> = symbols.into_iter().map(Symbol::new).collect();

        if symbols.is_empty() {
            return Err(GameError::InvalidConfig("symbol catalog is empty".into()));
        }

        let mut seen = FxHashSet::default();
        for symbol in &symbols {
            if symbol.as_str().trim().is_empty() {
                return Err(GameError::InvalidConfig("symbol catalog contains a blank symbol".into()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(GameError::InvalidConfig(format!(
                    "symbol {} appears more than once in the catalog",
                    symbol
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// Number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the catalog is empty. Never true for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The first `count` symbols, or fewer if the catalog is smaller.
    #[must_use]
    pub fn take(&self, count: usize) -> &[Symbol] {
        &self.symbols[..count.min(self.symbols.len())]
    }

    /// Iterate over all symbols in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Check if a symbol is in the catalog.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s.as_str() == symbol)
    }
}

impl TryFrom<Vec<String>> for SymbolCatalog {
    type Error = GameError;

    fn try_from(symbols: Vec<String>) -> Result<Self> {
        Self::from_symbols(symbols)
    }
}

impl From<SymbolCatalog> for Vec<String> {
    fn from(catalog: SymbolCatalog) -> Self {
        catalog.symbols.into_iter().map(|s| s.as_str().to_string()).collect()
    }
}
