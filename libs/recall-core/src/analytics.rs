//! Session analytics.
//!
//! Pure aggregation over [`SessionSummary`] rows: overall and per-deck
//! totals, study history, streaks and time-bucketed series for the
//! dashboard charts. Callers pass in the sessions already filtered to the
//! user (and deck) in question.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::SessionSummary;

/// Aggregate counters over a set of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_count: usize,
    pub total_time: f64,
    /// Mean of the per-session average time.
    pub avg_time_per_card: f64,
    pub total_correct: u64,
    pub total_reviewed: u64,
    /// Percentage, 0 when nothing was reviewed.
    pub accuracy: f64,
}

pub fn session_stats(sessions: &[SessionSummary]) -> SessionStats {
    if sessions.is_empty() {
        return SessionStats::default();
    }
    let total_time = sessions.iter().map(|s| s.deck_time).sum();
    let avg_sum: f64 = sessions.iter().map(|s| s.avg_time).sum();
    let total_correct = sessions.iter().map(|s| u64::from(s.correct_count)).sum();
    let total_reviewed = sessions.iter().map(|s| u64::from(s.total_cards)).sum();

    SessionStats {
        session_count: sessions.len(),
        total_time,
        avg_time_per_card: avg_sum / sessions.len() as f64,
        total_correct,
        total_reviewed,
        accuracy: percent(total_correct, total_reviewed),
    }
}

/// Number of sessions recorded on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDay {
    pub date: NaiveDate,
    pub session_count: usize,
}

/// The most recent `days` distinct study dates, newest first.
pub fn study_history(sessions: &[SessionSummary], days: usize) -> Vec<StudyDay> {
    sessions_per_date(sessions)
        .into_iter()
        .rev()
        .take(days)
        .map(|(date, session_count)| StudyDay { date, session_count })
        .collect()
}

/// Consecutive study days ending at the most recent study date.
pub fn study_streak(sessions: &[SessionSummary]) -> usize {
    let dates = sessions_per_date(sessions);
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for date in dates.keys().rev() {
        match expected {
            Some(day) if day != *date => break,
            _ => {}
        }
        streak += 1;
        expected = date.pred_opt();
    }
    streak
}

fn sessions_per_date(sessions: &[SessionSummary]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for session in sessions {
        *counts.entry(session.timestamp.date()).or_insert(0) += 1;
    }
    counts
}

/// Earliest and latest session timestamps.
pub fn timestamp_range(sessions: &[SessionSummary]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let min = sessions.iter().map(|s| s.timestamp).min()?;
    let max = sessions.iter().map(|s| s.timestamp).max()?;
    Some((min, max))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Session,
    Hour,
    Day,
}

/// How sessions are bucketed for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    by: GroupBy,
    step: u32,
}

impl Grouping {
    /// `step` counts hours or days per bucket and must be positive.
    pub fn new(by: GroupBy, step: u32) -> Result<Self> {
        if step == 0 {
            return Err(CoreError::InvalidArgument(
                "group_step must be a positive integer".to_string(),
            ));
        }
        Ok(Self { by, step })
    }

    pub fn per_session() -> Self {
        Self {
            by: GroupBy::Session,
            step: 1,
        }
    }

    fn width(&self) -> Duration {
        match self.by {
            GroupBy::Hour => Duration::hours(i64::from(self.step)),
            GroupBy::Session | GroupBy::Day => Duration::days(i64::from(self.step)),
        }
    }

    fn label(&self, start: NaiveDateTime) -> String {
        match self.by {
            GroupBy::Hour => start.format("%Y-%m-%d %H:%M").to_string(),
            GroupBy::Session | GroupBy::Day => start.format("%Y-%m-%d").to_string(),
        }
    }
}

impl Default for Grouping {
    fn default() -> Self {
        Self {
            by: GroupBy::Day,
            step: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    AverageTime,
    CumulativeRetention,
}

/// Parallel label/value sequences for one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn push(&mut self, label: String, value: f64) {
        self.labels.push(label);
        self.values.push(value);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    correct: u64,
    total: u64,
    time_sum: f64,
    sessions: usize,
}

impl Bucket {
    fn add(&mut self, session: &SessionSummary) {
        self.correct += u64::from(session.correct_count);
        self.total += u64::from(session.total_cards);
        self.time_sum += session.avg_time;
        self.sessions += 1;
    }

    fn merge(&mut self, other: &Bucket) {
        self.correct += other.correct;
        self.total += other.total;
        self.time_sum += other.time_sum;
        self.sessions += other.sessions;
    }

    fn accuracy(&self) -> f64 {
        percent(self.correct, self.total)
    }

    fn average_time(&self) -> f64 {
        if self.sessions == 0 {
            0.0
        } else {
            self.time_sum / self.sessions as f64
        }
    }
}

/// Build one metric series over `sessions`.
pub fn series(sessions: &[SessionSummary], metric: Metric, grouping: Grouping) -> Series {
    let mut ordered: Vec<&SessionSummary> = sessions.iter().collect();
    ordered.sort_by_key(|s| (s.timestamp, s.result_id));

    let buckets: Vec<(String, Bucket)> = match grouping.by {
        GroupBy::Session => ordered
            .iter()
            .map(|s| {
                let mut bucket = Bucket::default();
                bucket.add(s);
                (format!("Session {}", s.result_id), bucket)
            })
            .collect(),
        GroupBy::Hour | GroupBy::Day => windows(&ordered, grouping),
    };

    let mut out = Series::default();
    let mut running = Bucket::default();
    for (label, bucket) in buckets {
        let value = match metric {
            Metric::Accuracy => bucket.accuracy(),
            Metric::AverageTime => bucket.average_time(),
            Metric::CumulativeRetention => {
                running.merge(&bucket);
                running.accuracy()
            }
        };
        out.push(label, value);
    }
    out
}

pub fn accuracy_series(sessions: &[SessionSummary], grouping: Grouping) -> Series {
    series(sessions, Metric::Accuracy, grouping)
}

pub fn average_time_series(sessions: &[SessionSummary], grouping: Grouping) -> Series {
    series(sessions, Metric::AverageTime, grouping)
}

pub fn cumulative_retention_series(sessions: &[SessionSummary], grouping: Grouping) -> Series {
    series(sessions, Metric::CumulativeRetention, grouping)
}

// Contiguous `[start, start + width)` windows from the first timestamp until
// a window starts past the last one. Empty windows are kept. Hour labels
// carry the exact start minute since windows are not truncated.
fn windows(ordered: &[&SessionSummary], grouping: Grouping) -> Vec<(String, Bucket)> {
    let (Some(first), Some(last)) = (ordered.first(), ordered.last()) else {
        return Vec::new();
    };
    let width = grouping.width();
    let mut out = Vec::new();
    let mut start = first.timestamp;
    let mut rest = ordered;
    while start <= last.timestamp {
        // A window ending past the calendar range holds everything left.
        let end = start.checked_add_signed(width);
        let taken = match end {
            Some(end) => rest.iter().take_while(|s| s.timestamp < end).count(),
            None => rest.len(),
        };
        let mut bucket = Bucket::default();
        for session in &rest[..taken] {
            bucket.add(session);
        }
        rest = &rest[taken..];
        out.push((grouping.label(start), bucket));
        match end {
            Some(end) => start = end,
            None => break,
        }
    }
    out
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
