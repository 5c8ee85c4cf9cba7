//! Session recording.
//!
//! One summary row per completed sitting. Rows are never updated. Stored
//! timestamps strictly increase: an append in the same second as the latest
//! stored session is pushed one second past it.

use std::sync::Arc;

use chrono::Duration;
use recall_core::clock::Clock;
use recall_core::types::{DeckId, ResultId, SessionCounters, SessionSummary, UserId};

use crate::db::{SessionRepository, StoreHandle};
use crate::error::{Result, StudyError};
use crate::services::owned_deck;

pub struct SessionRecorder {
    store: StoreHandle,
    clock: Arc<dyn Clock>,
}

impl SessionRecorder {
    pub fn new(store: StoreHandle, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn record_session(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        counters: SessionCounters,
    ) -> Result<SessionSummary> {
        counters.validate()?;
        let now = self.clock.now();

        let summary = self.store.transaction(|repo| {
            owned_deck(repo, user_id, deck_id)?;
            let timestamp = match repo.latest_session_timestamp()? {
                Some(latest) if latest >= now => latest + Duration::seconds(1),
                _ => now,
            };
            let result_id = repo.append_session(user_id, deck_id, &counters, timestamp)?;
            Ok(SessionSummary {
                result_id,
                user_id,
                deck_id,
                total_cards: counters.total_cards,
                correct_count: counters.correct_count,
                avg_time: counters.avg_time,
                deck_time: counters.deck_time,
                timestamp,
            })
        })?;

        tracing::info!(
            user_id,
            deck_id,
            result_id = summary.result_id,
            total_cards = summary.total_cards,
            correct_count = summary.correct_count,
            "recorded session"
        );
        Ok(summary)
    }

    pub fn get_session(&self, result_id: ResultId) -> Result<SessionSummary> {
        self.store
            .with(|repo| repo.get_session(result_id))?
            .ok_or_else(|| StudyError::not_found("session", result_id))
    }
}
