//! Core study engine library shared by the engine application.
//!
//! Provides:
//! - Entity types and the 0-4 quality scale
//! - The SM-2 scheduling rule with midnight anchoring
//! - Deck prioritization by mean easiness factor
//! - Session analytics (totals, history, streaks, time series)
//! - Argon2 credential hashing
//! - A clock abstraction for reproducible scheduling

pub mod algorithm;
pub mod analytics;
pub mod clock;
pub mod credential;
pub mod error;
pub mod priority;
pub mod types;

pub use algorithm::{SchedulingResult, SpacedRepetitionAlgorithm};
pub use analytics::{GroupBy, Grouping, Metric, Series, SessionStats, StudyDay};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use priority::{DeckEase, DeckPriority, DeckPriorityTree, PriorityBand};
pub use types::{
    Card, CardId, CardPhase, Deck, DeckId, DeckInfo, DueCard, Quality, ResultId, ScheduleEntry,
    ScheduleState, SessionCounters, SessionSummary, User, UserId, UserTotals,
};
