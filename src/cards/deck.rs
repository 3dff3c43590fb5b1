//! Deck generation.
//!
//! A deck for a profile holds `2 * pair_count` cards: the first
//! `pair_count` catalog symbols, each twice, with sequential ids, shuffled.
//! Generation is a pure function of profile, catalog and RNG stream.

use super::card::{Card, CardId};
use super::catalog::SymbolCatalog;
use crate::core::config::DifficultyProfile;
use crate::core::error::{GameError, Result};
use crate::core::rng::GameRng;

/// Check that `catalog` can deal a valid deck for `profile`, without
/// drawing from any RNG.
pub fn check_deck_request(profile: &DifficultyProfile, catalog: &SymbolCatalog) -> Result<()> {
    profile.validate()?;

    if catalog.len() < profile.pair_count {
        return Err(GameError::InsufficientSymbols {
            requested: profile.pair_count,
            available: catalog.len(),
        });
    }
    Ok(())
}

/// Build a shuffled deck for `profile`.
///
/// Fails with `InsufficientSymbols` rather than silently shrinking the deck
/// when the catalog is too small.
///
/// ```
/// use memory_match::cards::{generate_deck, SymbolCatalog};
/// use memory_match::core::{Difficulty, GameRng};
///
/// let profile = Difficulty::Easy.profile();
/// let deck = generate_deck(&profile, &SymbolCatalog::default(), &mut GameRng::new(1)).unwrap();
/// assert_eq!(deck.len(), 12);
/// assert!(deck.iter().all(|card| !card.face_up && !card.matched));
/// ```
pub fn generate_deck(profile: &DifficultyProfile, catalog: &SymbolCatalog, rng: &mut GameRng) -> Result<Vec<Card>> {
    check_deck_request(profile, catalog)?;

    let mut deck = Vec::with_capacity(profile.card_count());
    let mut next_id = 0u32;
    for symbol in catalog.take(profile.pair_count) {
        for _ in 0..2 {
            deck.push(Card::new(CardId::new(next_id), symbol.clone()));
            next_id += 1;
        }
    }

    rng.shuffle(&mut deck);
    Ok(deck)
}
