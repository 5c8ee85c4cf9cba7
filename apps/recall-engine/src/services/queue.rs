//! Review queue: cards of a deck that are due for a user.

use std::sync::Arc;

use recall_core::clock::Clock;
use recall_core::types::{DeckId, DueCard, UserId};

use crate::db::{CardRepository, StoreHandle};
use crate::error::Result;
use crate::services::owned_deck;

pub struct ReviewQueue {
    store: StoreHandle,
    clock: Arc<dyn Clock>,
    limit: usize,
}

impl ReviewQueue {
    pub fn new(store: StoreHandle, clock: Arc<dyn Clock>, limit: usize) -> Self {
        Self { store, clock, limit }
    }

    /// Due cards, earliest first. Unseen cards are always due and sort as "now".
    pub fn due_cards(&self, user_id: UserId, deck_id: DeckId) -> Result<Vec<DueCard>> {
        let now = self.clock.now();
        let cards = self.store.transaction(|repo| {
            owned_deck(repo, user_id, deck_id)?;
            repo.due_cards(user_id, deck_id, now, self.limit)
        })?;
        tracing::debug!(user_id, deck_id, due = cards.len(), "built review queue");
        Ok(cards)
    }

    /// Number of due cards, without the queue limit.
    pub fn due_count(&self, user_id: UserId, deck_id: DeckId) -> Result<usize> {
        let now = self.clock.now();
        self.store
            .transaction(|repo| {
                owned_deck(repo, user_id, deck_id)?;
                repo.due_count(user_id, deck_id, now)
            })
            .map_err(Into::into)
    }
}
