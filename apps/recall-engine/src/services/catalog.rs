//! Deck and card management.

use recall_core::types::{require_text, Card, CardId, Deck, DeckId, DeckInfo, UserId};
use serde::{Deserialize, Serialize};

use crate::db::{CardRepository, DbError, DeckRepository, StoreHandle};
use crate::error::{Result, StudyError};
use crate::services::{existing_user, owned_deck};

/// Deck names with their card counts, for the distribution chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDistribution {
    pub names: Vec<String>,
    pub card_counts: Vec<usize>,
}

pub struct Catalog {
    store: StoreHandle,
}

impl Catalog {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn create_deck(&self, user_id: UserId, name: &str) -> Result<DeckId> {
        require_text("deck name", name)?;
        let deck_id = self.store.with(|repo| repo.create_deck(user_id, name.trim()))?;
        tracing::debug!(user_id, deck_id, "created deck");
        Ok(deck_id)
    }

    pub fn get_deck(&self, deck_id: DeckId) -> Result<Deck> {
        self.store
            .with(|repo| repo.get_deck(deck_id))?
            .ok_or_else(|| StudyError::not_found("deck", deck_id))
    }

    pub fn list_decks(&self, user_id: UserId) -> Result<Vec<Deck>> {
        self.store
            .transaction(|repo| {
                existing_user(repo, user_id)?;
                repo.list_decks(user_id)
            })
            .map_err(Into::into)
    }

    pub fn deck_info(&self, deck_id: DeckId) -> Result<DeckInfo> {
        self.store
            .transaction(|repo| {
                let deck = repo
                    .get_deck(deck_id)?
                    .ok_or_else(|| DbError::not_found("deck", deck_id))?;
                Ok(DeckInfo {
                    deck_id,
                    name: deck.name,
                    card_count: repo.count_cards(deck_id)?,
                })
            })
            .map_err(Into::into)
    }

    pub fn rename_deck(&self, deck_id: DeckId, name: &str) -> Result<()> {
        require_text("deck name", name)?;
        if !self.store.with(|repo| repo.rename_deck(deck_id, name.trim()))? {
            return Err(StudyError::not_found("deck", deck_id));
        }
        Ok(())
    }

    /// Delete a deck along with its cards, their schedule rows and its sessions.
    pub fn delete_deck(&self, deck_id: DeckId) -> Result<()> {
        if !self.store.with(|repo| repo.delete_deck(deck_id))? {
            return Err(StudyError::not_found("deck", deck_id));
        }
        tracing::debug!(deck_id, "deleted deck");
        Ok(())
    }

    pub fn deck_distribution(&self, user_id: UserId) -> Result<DeckDistribution> {
        let infos = self.store.transaction(|repo| {
            existing_user(repo, user_id)?;
            repo.list_deck_infos(user_id)
        })?;
        let (names, card_counts): (Vec<String>, Vec<usize>) = infos
            .into_iter()
            .map(|info| (info.name, info.card_count))
            .unzip();
        Ok(DeckDistribution { names, card_counts })
    }

    pub fn create_card(&self, deck_id: DeckId, question: &str, answer: &str) -> Result<CardId> {
        require_text("question", question)?;
        require_text("answer", answer)?;
        self.store
            .with(|repo| repo.create_card(deck_id, question, answer))
            .map_err(Into::into)
    }

    pub fn get_card(&self, card_id: CardId) -> Result<Card> {
        self.store
            .with(|repo| repo.get_card(card_id))?
            .ok_or_else(|| StudyError::not_found("card", card_id))
    }

    pub fn list_cards(&self, deck_id: DeckId) -> Result<Vec<Card>> {
        self.store
            .transaction(|repo| {
                repo.get_deck(deck_id)?
                    .ok_or_else(|| DbError::not_found("deck", deck_id))?;
                repo.list_cards(deck_id)
            })
            .map_err(Into::into)
    }

    /// Card count of a deck; 0 for a deck that does not exist.
    pub fn count_cards(&self, deck_id: DeckId) -> Result<usize> {
        self.store
            .with(|repo| repo.count_cards(deck_id))
            .map_err(Into::into)
    }

    pub fn update_card(&self, card_id: CardId, question: &str, answer: &str) -> Result<()> {
        require_text("question", question)?;
        require_text("answer", answer)?;
        if !self
            .store
            .with(|repo| repo.update_card(card_id, question, answer))?
        {
            return Err(StudyError::not_found("card", card_id));
        }
        Ok(())
    }

    pub fn delete_card(&self, card_id: CardId) -> Result<()> {
        if !self.store.with(|repo| repo.delete_card(card_id))? {
            return Err(StudyError::not_found("card", card_id));
        }
        Ok(())
    }

    /// Fetch a deck only if `user_id` owns it.
    pub fn owned_deck(&self, user_id: UserId, deck_id: DeckId) -> Result<Deck> {
        self.store
            .with(|repo| owned_deck(repo, user_id, deck_id))
            .map_err(Into::into)
    }
}
