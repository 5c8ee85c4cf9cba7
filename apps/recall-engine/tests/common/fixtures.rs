//! Test fixtures and factory functions for creating test data.

use chrono::{NaiveDate, NaiveDateTime};
use recall_core::types::SessionCounters;

/// 2025-01-15 10:30:00, the moment most scenarios start from.
pub fn reference_time() -> NaiveDateTime {
    at(15, 10, 30)
}

/// A January 2025 wall-clock time.
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

/// Generate `count` question/answer pairs.
pub fn sample_cards(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("Question {}?", i + 1), format!("Answer {}.", i + 1)))
        .collect()
}

/// Counters for a sitting of `total` cards with `correct` right answers.
pub fn counters(total: u32, correct: u32, avg_time: f64) -> SessionCounters {
    SessionCounters {
        total_cards: total,
        correct_count: correct,
        avg_time,
        deck_time: avg_time * f64::from(total),
    }
}
