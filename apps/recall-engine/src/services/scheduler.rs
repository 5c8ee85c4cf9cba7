//! Spaced-repetition scheduling of individual cards.
//!
//! `update_schedule` reads the (user, card) entry, creates it with default
//! state on first study, applies the algorithm and writes the result back,
//! all inside one transaction.

use std::sync::Arc;

use recall_core::algorithm::sm2::Sm2;
use recall_core::algorithm::SpacedRepetitionAlgorithm;
use recall_core::clock::Clock;
use recall_core::types::{CardId, Quality, ScheduleEntry, ScheduleState, UserId, DEFAULT_EASE};

use crate::db::{CardRepository, DbError, ScheduleRepository, StoreHandle};
use crate::error::{Result, StudyError};
use crate::services::existing_user;

pub struct Scheduler {
    store: StoreHandle,
    clock: Arc<dyn Clock>,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
}

impl Scheduler {
    pub fn new(store: StoreHandle, clock: Arc<dyn Clock>) -> Self {
        Self::with_algorithm(store, clock, Box::new(Sm2::default()))
    }

    pub fn with_algorithm(
        store: StoreHandle,
        clock: Arc<dyn Clock>,
        algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    ) -> Self {
        Self {
            store,
            clock,
            algorithm,
        }
    }

    /// Advance a card after the user rated it `quality` (0-4).
    ///
    /// Negative `time_taken` is stored as 0.
    pub fn update_schedule(
        &self,
        user_id: UserId,
        card_id: CardId,
        quality: u8,
        time_taken: f64,
    ) -> Result<ScheduleState> {
        let quality = Quality::try_from(quality)?;
        let time_taken = if time_taken.is_finite() {
            time_taken.max(0.0)
        } else {
            0.0
        };
        let now = self.clock.now();

        let state = self.store.transaction(|repo| {
            existing_user(repo, user_id)?;
            repo.get_card(card_id)?
                .ok_or_else(|| DbError::not_found("card", card_id))?;

            let entry = match repo.get_schedule(user_id, card_id)? {
                Some(entry) => entry,
                None => {
                    let entry = ScheduleEntry {
                        user_id,
                        card_id,
                        state: self.algorithm.initial_state(now),
                        last_time_taken: 0.0,
                        last_is_correct: None,
                    };
                    repo.upsert_schedule(&entry)?;
                    entry
                }
            };

            let result = self.algorithm.schedule(&entry.state, quality, now);
            repo.upsert_schedule(&ScheduleEntry {
                state: result.new_state.clone(),
                last_time_taken: time_taken,
                ..entry
            })?;
            Ok(result.new_state)
        })?;

        tracing::debug!(
            algorithm = self.algorithm.name(),
            user_id,
            card_id,
            quality = quality.to_value(),
            repetition = state.repetition,
            interval_minutes = state.interval_minutes,
            ease_factor = state.ease_factor,
            next_review_at = %state.next_review_at,
            "updated schedule"
        );
        Ok(state)
    }

    pub fn get_schedule(&self, user_id: UserId, card_id: CardId) -> Result<Option<ScheduleEntry>> {
        self.store
            .with(|repo| repo.get_schedule(user_id, card_id))
            .map_err(Into::into)
    }

    /// Stored ease of a card for a user, or the default for an unseen card.
    pub fn card_easiness(&self, user_id: UserId, card_id: CardId) -> Result<f64> {
        let entry = self.get_schedule(user_id, card_id)?;
        Ok(entry.map_or(DEFAULT_EASE, |e| e.state.ease_factor))
    }

    /// Record whether the last attempt was answered correctly.
    ///
    /// Informational only; scheduling never reads it.
    pub fn mark_correctness(&self, user_id: UserId, card_id: CardId, is_correct: bool) -> Result<()> {
        if !self
            .store
            .with(|repo| repo.set_last_correct(user_id, card_id, is_correct))?
        {
            return Err(StudyError::NotFound(format!(
                "schedule for user {user_id} and card {card_id}"
            )));
        }
        Ok(())
    }
}
