//! SM-2 variant with minute buckets for failed recalls and midnight
//! anchoring for successful ones.
//!
//! Ratings 0-2 keep the card in short-term rotation a few minutes out.
//! Ratings 3-4 push it to local midnight one or three days ahead, so two
//! reviews on the same day land on the same next-review moment.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{Quality, ScheduleState, DEFAULT_EASE, DEFAULT_INTERVAL_MINUTES, MINIMUM_EASE};
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub very_hard_minutes: i64,
    pub hard_minutes: i64,
    pub medium_minutes: i64,
    pub easy_days: i64,
    pub very_easy_days: i64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_EASE,
            minimum_ease: MINIMUM_EASE,
            very_hard_minutes: 2,
            hard_minutes: 6,
            medium_minutes: 10,
            easy_days: 1,
            very_easy_days: 3,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: NaiveDateTime) -> ScheduleState {
        ScheduleState {
            repetition: 0,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            ease_factor: self.initial_ease,
            next_review_at: now,
        }
    }

    fn schedule(&self, state: &ScheduleState, quality: Quality, now: NaiveDateTime) -> SchedulingResult {
        let (repetition, interval_minutes, next_review_at) = match quality {
            Quality::VeryHard => self.short_term(now, self.very_hard_minutes),
            Quality::Hard => self.short_term(now, self.hard_minutes),
            Quality::Medium => self.short_term(now, self.medium_minutes),
            Quality::Easy => self.long_term(state, now, self.easy_days),
            Quality::VeryEasy => self.long_term(state, now, self.very_easy_days),
        };

        SchedulingResult {
            new_state: ScheduleState {
                repetition,
                interval_minutes,
                ease_factor: self.next_ease(state.ease_factor, quality),
                next_review_at,
            },
            next_review_at,
        }
    }
}

impl Sm2 {
    /// Ease update applied for every rating, clamped at the floor.
    pub fn next_ease(&self, ease: f64, quality: Quality) -> f64 {
        let miss = f64::from(4 - quality.to_value());
        let updated = ease + (0.1 - miss * (0.08 + miss * 0.02));
        updated.max(self.minimum_ease)
    }

    fn short_term(&self, now: NaiveDateTime, minutes: i64) -> (u32, i64, NaiveDateTime) {
        (0, minutes, now + Duration::minutes(minutes))
    }

    fn long_term(&self, state: &ScheduleState, now: NaiveDateTime, days: i64) -> (u32, i64, NaiveDateTime) {
        let next = midnight_after(now, days);
        // Stored intervals are positive even in the last minute before midnight.
        let interval = (next - now).num_minutes().max(1);
        (state.repetition.saturating_add(1), interval, next)
    }
}

/// Local midnight at the start of the day `days` after `now`'s date.
pub fn midnight_after(now: NaiveDateTime, days: i64) -> NaiveDateTime {
    (now.date() + Duration::days(days)).and_time(NaiveTime::MIN)
}
