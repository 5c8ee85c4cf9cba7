//! Dashboard statistics over recorded sessions.

use chrono::NaiveDateTime;
use recall_core::analytics::{self, Grouping, Metric, Series, SessionStats, StudyDay};
use recall_core::types::{DeckId, SessionSummary, UserId};

use crate::db::{SessionRepository, StoreHandle};
use crate::error::Result;
use crate::services::{existing_user, owned_deck};

pub struct Analytics {
    store: StoreHandle,
    history_days: usize,
}

impl Analytics {
    pub fn new(store: StoreHandle, history_days: usize) -> Self {
        Self { store, history_days }
    }

    fn user_sessions(&self, user_id: UserId) -> Result<Vec<SessionSummary>> {
        self.store
            .transaction(|repo| {
                existing_user(repo, user_id)?;
                repo.list_sessions(user_id, None)
            })
            .map_err(Into::into)
    }

    fn deck_sessions(&self, user_id: UserId, deck_id: DeckId) -> Result<Vec<SessionSummary>> {
        self.store
            .transaction(|repo| {
                owned_deck(repo, user_id, deck_id)?;
                repo.list_sessions(user_id, Some(deck_id))
            })
            .map_err(Into::into)
    }

    pub fn overall_stats(&self, user_id: UserId) -> Result<SessionStats> {
        Ok(analytics::session_stats(&self.user_sessions(user_id)?))
    }

    pub fn deck_stats(&self, user_id: UserId, deck_id: DeckId) -> Result<SessionStats> {
        Ok(analytics::session_stats(&self.deck_sessions(user_id, deck_id)?))
    }

    /// Most recent study dates with session counts, newest first.
    pub fn study_history(&self, user_id: UserId) -> Result<Vec<StudyDay>> {
        let sessions = self.user_sessions(user_id)?;
        Ok(analytics::study_history(&sessions, self.history_days))
    }

    pub fn study_streak(&self, user_id: UserId) -> Result<usize> {
        Ok(analytics::study_streak(&self.user_sessions(user_id)?))
    }

    pub fn deck_timestamp_range(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
        Ok(analytics::timestamp_range(&self.deck_sessions(user_id, deck_id)?))
    }

    pub fn deck_series(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        metric: Metric,
        grouping: Grouping,
    ) -> Result<Series> {
        let sessions = self.deck_sessions(user_id, deck_id)?;
        Ok(analytics::series(&sessions, metric, grouping))
    }

    pub fn accuracy_over_time(&self, user_id: UserId, deck_id: DeckId, grouping: Grouping) -> Result<Series> {
        self.deck_series(user_id, deck_id, Metric::Accuracy, grouping)
    }

    pub fn average_time_over_time(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        grouping: Grouping,
    ) -> Result<Series> {
        self.deck_series(user_id, deck_id, Metric::AverageTime, grouping)
    }

    pub fn cumulative_retention(&self, user_id: UserId, deck_id: DeckId, grouping: Grouping) -> Result<Series> {
        self.deck_series(user_id, deck_id, Metric::CumulativeRetention, grouping)
    }
}
