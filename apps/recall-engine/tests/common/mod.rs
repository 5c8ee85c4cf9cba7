//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up an engine over a private in-memory store
//! - A fixed, adjustable clock
//! - Helpers for creating users, decks and cards

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use recall_core::clock::FixedClock;
use recall_core::types::{CardId, DeckId, UserId};
use recall_engine::{EngineConfig, StudyEngine};

/// Test context holding an engine and the clock it reads.
///
/// Every context gets its own uniquely named in-memory store.
pub struct TestContext {
    pub engine: StudyEngine,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    /// Engine pinned to [`fixtures::reference_time`].
    pub fn new() -> Self {
        Self::with_config(EngineConfig::in_memory(), fixtures::reference_time())
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self::with_config(EngineConfig::in_memory(), now)
    }

    pub fn with_config(config: EngineConfig, now: NaiveDateTime) -> Self {
        let clock = Arc::new(FixedClock::new(now));
        let engine = StudyEngine::open_with_clock(&config, clock.clone())
            .expect("Failed to open test engine");
        Self { engine, clock }
    }

    pub fn now(&self) -> NaiveDateTime {
        recall_core::clock::Clock::now(self.clock.as_ref())
    }

    pub fn set_now(&self, now: NaiveDateTime) {
        self.clock.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Create a user named `name` with password `password`.
    pub fn create_user(&self, name: &str) -> UserId {
        self.engine
            .accounts
            .create_user(name, &format!("{name}@example.com"), "password")
            .expect("Failed to create test user")
    }

    /// Create a deck holding `cards` generated cards.
    pub fn create_deck(&self, user_id: UserId, name: &str, cards: usize) -> (DeckId, Vec<CardId>) {
        let deck_id = self
            .engine
            .catalog
            .create_deck(user_id, name)
            .expect("Failed to create test deck");
        let card_ids = fixtures::sample_cards(cards)
            .into_iter()
            .map(|(question, answer)| {
                self.engine
                    .catalog
                    .create_card(deck_id, &question, &answer)
                    .expect("Failed to create test card")
            })
            .collect();
        (deck_id, card_ids)
    }

    /// Rate a card, panicking on failure.
    pub fn rate(&self, user_id: UserId, card_id: CardId, quality: u8) {
        self.engine
            .scheduler
            .update_schedule(user_id, card_id, quality, 3.0)
            .expect("Failed to update schedule");
    }
}
