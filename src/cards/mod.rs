//! Card system: cards, the symbol catalog, and deck generation.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier of a card within one deck
//! - `Symbol`: Card face; equal symbols form a pair
//! - `Card`: Runtime card state (face-up, matched)
//! - `SymbolCatalog`: Ordered, duplicate-free symbol source
//! - `generate_deck`: Shuffled paired deck for a difficulty profile

pub mod card;
pub mod catalog;
pub mod deck;

pub use card::{Card, CardId, Symbol};
pub use catalog::{SymbolCatalog, DEFAULT_SYMBOLS};
pub use deck::{check_deck_request, generate_deck};
