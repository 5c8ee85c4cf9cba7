//! Deck prioritization and performance scores.

use recall_core::priority::{performance_score, prioritize, DeckPriority, PriorityBand};
use recall_core::types::{DeckId, UserId};

use crate::db::{DeckRepository, StoreHandle};
use crate::error::Result;
use crate::services::{existing_user, owned_deck};

pub struct DeckPrioritizer {
    store: StoreHandle,
}

impl DeckPrioritizer {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// A user's decks, lowest mean ease first. Empty decks lead with mean 0.
    pub fn prioritized_decks(&self, user_id: UserId) -> Result<Vec<DeckPriority>> {
        let ease = self.store.transaction(|repo| {
            existing_user(repo, user_id)?;
            repo.deck_ease(user_id, None)
        })?;
        Ok(prioritize(&ease))
    }

    /// The priority listing restricted to one band, order preserved.
    pub fn prioritized_decks_in_band(
        &self,
        user_id: UserId,
        band: PriorityBand,
    ) -> Result<Vec<DeckPriority>> {
        let mut decks = self.prioritized_decks(user_id)?;
        decks.retain(|deck| band.contains(deck.avg_ef));
        Ok(decks)
    }

    /// Mean ease of a deck mapped onto 0..=100.
    pub fn deck_performance_score(&self, user_id: UserId, deck_id: DeckId) -> Result<f64> {
        let ease = self.store.transaction(|repo| {
            owned_deck(repo, user_id, deck_id)?;
            repo.deck_ease(user_id, Some(deck_id))
        })?;
        let avg_ef = ease.first().map_or(0.0, |deck| deck.avg_ef());
        Ok(performance_score(avg_ef))
    }
}
