//! Core types for the study engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub type UserId = i64;
pub type DeckId = i64;
pub type CardId = i64;
pub type ResultId = i64;

/// Easiness factor assigned to a card that has never been studied.
pub const DEFAULT_EASE: f64 = 2.5;

/// Floor for the easiness factor.
pub const MINIMUM_EASE: f64 = 1.3;

/// Interval (minutes) stored on a freshly created schedule entry.
pub const DEFAULT_INTERVAL_MINUTES: i64 = 2;

/// A registered user. The credential is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub credential: String,
}

/// A deck owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub deck_id: DeckId,
    pub user_id: UserId,
    pub name: String,
}

/// Deck name with its card count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInfo {
    pub deck_id: DeckId,
    pub name: String,
    pub card_count: usize,
}

/// A question/answer card inside a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: CardId,
    pub deck_id: DeckId,
    pub question: String,
    pub answer: String,
}

/// Quality rating given after seeing an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    VeryHard,
    Hard,
    Medium,
    Easy,
    VeryEasy,
}

impl Quality {
    /// Convert to the 0-4 numeric scale.
    pub fn to_value(self) -> u8 {
        match self {
            Self::VeryHard => 0,
            Self::Hard => 1,
            Self::Medium => 2,
            Self::Easy => 3,
            Self::VeryEasy => 4,
        }
    }

    /// Create from the 0-4 numeric scale.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::VeryHard),
            1 => Some(Self::Hard),
            2 => Some(Self::Medium),
            3 => Some(Self::Easy),
            4 => Some(Self::VeryEasy),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Quality {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(CoreError::InvalidQuality(value))
    }
}

/// Where a card sits in the per-(user, card) state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPhase {
    /// No schedule entry yet.
    Unseen,
    /// Minute-bucket scheduling, repetition is zero.
    ShortTerm,
    /// Day-bucket scheduling, repetition is at least one.
    LongTerm,
}

impl CardPhase {
    pub fn of(state: Option<&ScheduleState>) -> Self {
        match state {
            None => Self::Unseen,
            Some(s) if s.repetition == 0 => Self::ShortTerm,
            Some(_) => Self::LongTerm,
        }
    }
}

/// The scheduling state the algorithm advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub repetition: u32,
    pub interval_minutes: i64,
    pub ease_factor: f64,
    pub next_review_at: NaiveDateTime,
}

impl ScheduleState {
    pub fn phase(&self) -> CardPhase {
        CardPhase::of(Some(self))
    }
}

/// Persisted schedule row for one (user, card) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub user_id: UserId,
    pub card_id: CardId,
    #[serde(flatten)]
    pub state: ScheduleState,
    pub last_time_taken: f64,
    /// Set by the quiz screen's correct/incorrect buttons. Not used for scheduling.
    pub last_is_correct: Option<bool>,
}

/// Card waiting in a review queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueCard {
    pub card_id: CardId,
    pub question: String,
    pub answer: String,
    pub next_review_at: NaiveDateTime,
}

/// Immutable summary of one completed study sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub result_id: ResultId,
    pub user_id: UserId,
    pub deck_id: DeckId,
    pub total_cards: u32,
    pub correct_count: u32,
    pub avg_time: f64,
    pub deck_time: f64,
    pub timestamp: NaiveDateTime,
}

/// Counters collected by the front-end at the end of a sitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub total_cards: u32,
    pub correct_count: u32,
    pub avg_time: f64,
    pub deck_time: f64,
}

impl SessionCounters {
    /// Check the counters describe a possible sitting.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.correct_count > self.total_cards {
            return Err(CoreError::InvalidArgument(format!(
                "correct_count {} exceeds total_cards {}",
                self.correct_count, self.total_cards
            )));
        }
        if !self.avg_time.is_finite() || self.avg_time < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "avg_time must be a non-negative number, got {}",
                self.avg_time
            )));
        }
        if !self.deck_time.is_finite() || self.deck_time < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "deck_time must be a non-negative number, got {}",
                self.deck_time
            )));
        }
        Ok(())
    }
}

/// Deck and card totals for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotals {
    pub total_decks: usize,
    pub total_cards: usize,
}

/// Require a non-blank text field.
pub fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(())
}
