//! Session recording and analytics tests.

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;
use recall_core::analytics::{GroupBy, Grouping, Metric};
use recall_core::types::SessionCounters;
use recall_engine::{ErrorKind, StudyError};

use common::fixtures::{at, counters};
use common::TestContext;

/// A recorded session is stamped with the current time.
#[test]
fn test_record_session() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 5);

    let summary = ctx
        .engine
        .sessions
        .record_session(user, deck, counters(5, 4, 2.5))
        .unwrap();

    assert_eq!(summary.timestamp, ctx.now());
    assert_eq!(summary.total_cards, 5);
    assert_eq!(summary.correct_count, 4);
    assert_eq!(summary.deck_time, 12.5);
    assert_eq!(ctx.engine.sessions.get_session(summary.result_id).unwrap(), summary);
}

/// Appends within the same second still get strictly increasing timestamps.
#[test]
fn test_session_timestamps_monotonic() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);

    let first = ctx.engine.sessions.record_session(user, deck, counters(1, 1, 1.0)).unwrap();
    let second = ctx.engine.sessions.record_session(user, deck, counters(1, 0, 1.0)).unwrap();
    ctx.set_now(at(15, 10, 0));
    let third = ctx.engine.sessions.record_session(user, deck, counters(1, 0, 1.0)).unwrap();

    assert_eq!(second.timestamp, first.timestamp + Duration::seconds(1));
    assert_eq!(third.timestamp, second.timestamp + Duration::seconds(1));
}

/// Impossible counters are rejected and nothing is stored.
#[test]
fn test_invalid_counters() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);

    let bad = [
        counters(3, 4, 1.0),
        SessionCounters {
            total_cards: 2,
            correct_count: 1,
            avg_time: -1.0,
            deck_time: 2.0,
        },
        SessionCounters {
            total_cards: 2,
            correct_count: 1,
            avg_time: 1.0,
            deck_time: f64::NAN,
        },
    ];
    for sitting in bad {
        let err = ctx
            .engine
            .sessions
            .record_session(user, deck, sitting)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
    assert_eq!(ctx.engine.analytics.deck_stats(user, deck).unwrap().session_count, 0);
}

/// Sessions need an existing deck owned by the user.
#[test]
fn test_session_for_foreign_deck() {
    let ctx = TestContext::new();
    let ada = ctx.create_user("ada");
    let bob = ctx.create_user("bob");
    let (deck, _) = ctx.create_deck(ada, "Physics", 1);

    for (user, deck) in [(bob, deck), (ada, 404)] {
        let err = ctx
            .engine
            .sessions
            .record_session(user, deck, counters(1, 1, 1.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

/// Overall and per-deck stats.
#[test]
fn test_stats() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (physics, _) = ctx.create_deck(user, "Physics", 1);
    let (chemistry, _) = ctx.create_deck(user, "Chemistry", 1);

    ctx.engine.sessions.record_session(user, physics, counters(10, 8, 2.0)).unwrap();
    ctx.engine.sessions.record_session(user, physics, counters(10, 6, 4.0)).unwrap();
    ctx.engine.sessions.record_session(user, chemistry, counters(5, 5, 3.0)).unwrap();

    let overall = ctx.engine.analytics.overall_stats(user).unwrap();
    assert_eq!(overall.session_count, 3);
    assert_eq!(overall.total_correct, 19);
    assert_eq!(overall.total_reviewed, 25);
    assert_eq!(overall.avg_time_per_card, 3.0);
    assert_eq!(overall.total_time, 20.0 + 40.0 + 15.0);
    assert!((overall.accuracy - 76.0).abs() < 1e-9);

    let deck = ctx.engine.analytics.deck_stats(user, physics).unwrap();
    assert_eq!(deck.session_count, 2);
    assert!((deck.accuracy - 70.0).abs() < 1e-9);
    assert!(overall.total_reviewed >= overall.total_correct);
}

/// Appending changes stats by exactly the new row.
#[test]
fn test_append_only_stats() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);
    ctx.engine.sessions.record_session(user, deck, counters(4, 2, 1.0)).unwrap();

    let before = ctx.engine.analytics.deck_stats(user, deck).unwrap();
    ctx.engine.sessions.record_session(user, deck, counters(6, 5, 1.0)).unwrap();
    let after = ctx.engine.analytics.deck_stats(user, deck).unwrap();

    assert_eq!(after.session_count, before.session_count + 1);
    assert_eq!(after.total_correct, before.total_correct + 5);
    assert_eq!(after.total_reviewed, before.total_reviewed + 6);
    assert_eq!(after.total_time, before.total_time + 6.0);
}

/// Empty history gives zeroed stats and empty series.
#[test]
fn test_empty_history() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);

    let stats = ctx.engine.analytics.overall_stats(user).unwrap();
    assert_eq!(stats.session_count, 0);
    assert_eq!(stats.accuracy, 0.0);
    assert!(ctx.engine.analytics.study_history(user).unwrap().is_empty());
    assert_eq!(ctx.engine.analytics.study_streak(user).unwrap(), 0);
    assert_eq!(ctx.engine.analytics.deck_timestamp_range(user, deck).unwrap(), None);
    for metric in [Metric::Accuracy, Metric::AverageTime, Metric::CumulativeRetention] {
        let series = ctx
            .engine
            .analytics
            .deck_series(user, deck, metric, Grouping::default())
            .unwrap();
        assert!(series.is_empty());
    }
}

/// History covers the latest distinct dates, newest first; streak counts back.
#[test]
fn test_history_and_streak() {
    let ctx = TestContext::at(at(1, 9, 0));
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);

    // Days 1-10 except day 6, two sessions on day 10.
    for day in (1..=10).filter(|d| *d != 6) {
        ctx.set_now(at(day, 9, 0));
        ctx.engine.sessions.record_session(user, deck, counters(2, 1, 1.0)).unwrap();
    }
    ctx.set_now(at(10, 18, 0));
    ctx.engine.sessions.record_session(user, deck, counters(2, 2, 1.0)).unwrap();

    let history = ctx.engine.analytics.study_history(user).unwrap();
    assert_eq!(history.len(), 7);
    assert_eq!(history[0].date, at(10, 0, 0).date());
    assert_eq!(history[0].session_count, 2);
    assert_eq!(history[4].date, at(5, 0, 0).date());
    assert!(history.windows(2).all(|w| w[0].date > w[1].date));
    assert_eq!(ctx.engine.analytics.study_streak(user).unwrap(), 4);
}

/// Per-session series label points with the session id.
#[test]
fn test_session_series() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);
    let a = ctx.engine.sessions.record_session(user, deck, counters(4, 2, 3.0)).unwrap();
    ctx.advance(Duration::minutes(30));
    let b = ctx.engine.sessions.record_session(user, deck, counters(4, 4, 1.0)).unwrap();

    let grouping = Grouping::per_session();
    let accuracy = ctx.engine.analytics.accuracy_over_time(user, deck, grouping).unwrap();
    assert_eq!(
        accuracy.labels,
        vec![format!("Session {}", a.result_id), format!("Session {}", b.result_id)]
    );
    assert_eq!(accuracy.values, vec![50.0, 100.0]);

    let avg = ctx.engine.analytics.average_time_over_time(user, deck, grouping).unwrap();
    assert_eq!(avg.values, vec![3.0, 1.0]);

    let retention = ctx.engine.analytics.cumulative_retention(user, deck, grouping).unwrap();
    assert_eq!(retention.values, vec![50.0, 75.0]);
}

/// Hour and day buckets start at the first session and keep empty windows.
#[test]
fn test_bucketed_series() {
    let ctx = TestContext::at(at(10, 9, 15));
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);
    for (when, c) in [
        (at(10, 9, 15), counters(10, 5, 2.0)),
        (at(10, 9, 50), counters(10, 10, 4.0)),
        (at(10, 12, 0), counters(5, 0, 6.0)),
    ] {
        ctx.set_now(when);
        ctx.engine.sessions.record_session(user, deck, c).unwrap();
    }

    let hourly = Grouping::new(GroupBy::Hour, 1).unwrap();
    let accuracy = ctx.engine.analytics.accuracy_over_time(user, deck, hourly).unwrap();
    assert_eq!(
        accuracy.labels,
        vec!["2025-01-10 09:15", "2025-01-10 10:15", "2025-01-10 11:15"]
    );
    assert_eq!(accuracy.values, vec![75.0, 0.0, 0.0]);

    let retention = ctx.engine.analytics.cumulative_retention(user, deck, hourly).unwrap();
    assert_eq!(retention.values, vec![75.0, 75.0, 60.0]);

    let daily = Grouping::new(GroupBy::Day, 1).unwrap();
    let avg = ctx.engine.analytics.average_time_over_time(user, deck, daily).unwrap();
    assert_eq!(avg.labels, vec!["2025-01-10"]);
    assert_eq!(avg.values, vec![4.0]);

    assert_eq!(
        ctx.engine.analytics.deck_timestamp_range(user, deck).unwrap(),
        Some((at(10, 9, 15), at(10, 12, 0)))
    );
}

/// Analytics on another user's deck are NotFound; a zero step is invalid.
#[test]
fn test_series_errors() {
    let ctx = TestContext::new();
    let ada = ctx.create_user("ada");
    let bob = ctx.create_user("bob");
    let (deck, _) = ctx.create_deck(ada, "Physics", 1);

    let err = ctx
        .engine
        .analytics
        .deck_series(bob, deck, Metric::Accuracy, Grouping::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = StudyError::from(Grouping::new(GroupBy::Day, 0).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

/// A step reaching past the calendar range folds the history into one bucket.
#[test]
fn test_huge_group_step() {
    let ctx = TestContext::new();
    let user = ctx.create_user("ada");
    let (deck, _) = ctx.create_deck(user, "Physics", 1);
    ctx.engine.sessions.record_session(user, deck, counters(4, 3, 1.0)).unwrap();
    ctx.advance(Duration::days(2));
    ctx.engine.sessions.record_session(user, deck, counters(4, 1, 1.0)).unwrap();

    let grouping = Grouping::new(GroupBy::Hour, u32::MAX).unwrap();
    let series = ctx.engine.analytics.accuracy_over_time(user, deck, grouping).unwrap();
    assert_eq!(series.labels, vec!["2025-01-15 10:30"]);
    assert_eq!(series.values, vec![50.0]);
}
