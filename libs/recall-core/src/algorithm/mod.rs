//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{Quality, ScheduleState};
use chrono::NaiveDateTime;

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub new_state: ScheduleState,
    pub next_review_at: NaiveDateTime,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate next review state after a review.
    fn schedule(&self, state: &ScheduleState, quality: Quality, now: NaiveDateTime) -> SchedulingResult;

    /// State written for a card studied for the first time at `now`.
    fn initial_state(&self, now: NaiveDateTime) -> ScheduleState;
}
