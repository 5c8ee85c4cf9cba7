//! Engine components. Each owns its own store connection.

pub mod accounts;
pub mod analytics;
pub mod catalog;
pub mod priority;
pub mod queue;
pub mod scheduler;
pub mod sessions;

use recall_core::types::{Deck, DeckId, UserId};

use crate::db::{DbError, DeckRepository, SqliteRepository, UserRepository};

/// Load a deck and check it belongs to `user_id`.
///
/// A deck owned by someone else reports as missing.
pub(crate) fn owned_deck(repo: &SqliteRepository, user_id: UserId, deck_id: DeckId) -> Result<Deck, DbError> {
    match repo.get_deck(deck_id)? {
        Some(deck) if deck.user_id == user_id => Ok(deck),
        _ => Err(DbError::not_found("deck", deck_id)),
    }
}

pub(crate) fn existing_user(repo: &SqliteRepository, user_id: UserId) -> Result<(), DbError> {
    repo.get_user(user_id)?
        .map(|_| ())
        .ok_or_else(|| DbError::not_found("user", user_id))
}
