//! # Aggregator
//!
//! Pure functions that summarize the event logs over a rolling 24-hour window
//! ending at a caller-supplied instant. Nothing here reads the clock or touches
//! storage, so every function is deterministic for a given `now`.
//!
//! Log order matters: "last" always means the most recently appended record,
//! not the one with the latest timestamp.

use chrono::{DateTime, Duration, Utc};
use shared::BreastSide;

use super::models::{FeedEvent, SleepEvent};

/// Length of the rolling window
pub const ROLLING_WINDOW_HOURS: i64 = 24;

/// Gap between feeds suggested once the baby is four weeks old
pub const FEED_INTERVAL_HOURS: i64 = 4;

/// Minimum age at which a next-feed suggestion is given
pub const FEED_SUGGESTION_MIN_AGE_WEEKS: i64 = 4;

/// Count and volume of feeds inside the rolling window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeedTotals {
    pub count: usize,
    /// Rounded to one decimal
    pub ounces: f64,
}

/// The most recent event of a log and how long ago it happened
#[derive(Debug, Clone, PartialEq)]
pub struct LastEventInfo {
    pub at: DateTime<Utc>,
    pub elapsed: String,
}

fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(ROLLING_WINDOW_HOURS)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Hours of sleep overlapping `[now - 24h, now]`.
///
/// Each interval is clipped to the window on both sides; sleep after `now`
/// never counts. Overlapping events are summed independently.
pub fn rolling_sleep_hours(events: &[SleepEvent], now: DateTime<Utc>) -> f64 {
    let window_start = window_start(now);

    let total_seconds: i64 = events
        .iter()
        .map(|event| {
            let start = event.start.max(window_start);
            let end = event.end.min(now);
            (end - start).num_seconds().max(0)
        })
        .sum();

    total_seconds as f64 / 3600.0
}

/// Number of feeds started in `(now - 24h, now]` and their total ounces
pub fn rolling_feed_totals(events: &[FeedEvent], now: DateTime<Utc>) -> FeedTotals {
    let window_start = window_start(now);

    let (count, ounces) = events
        .iter()
        .filter(|event| event.start > window_start && event.start <= now)
        .fold((0usize, 0.0f64), |(count, ounces), event| {
            (count + 1, ounces + event.amount_ounces)
        });

    FeedTotals {
        count,
        ounces: round_to(ounces, 1),
    }
}

/// Format an elapsed duration as whole hours and minutes, e.g. `"3h 7m"`.
/// Negative durations (future-dated entries) render as `"0h 0m"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_minutes = elapsed.num_minutes().max(0);
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Start of the most recently appended feed
pub fn last_feed_info(events: &[FeedEvent], now: DateTime<Utc>) -> Option<LastEventInfo> {
    events.last().map(|event| LastEventInfo {
        at: event.start,
        elapsed: format_elapsed(now - event.start),
    })
}

/// End of the most recently appended sleep
pub fn last_sleep_info(events: &[SleepEvent], now: DateTime<Utc>) -> Option<LastEventInfo> {
    events.last().map(|event| LastEventInfo {
        at: event.end,
        elapsed: format_elapsed(now - event.end),
    })
}

/// Side of the most recently appended feed that recorded one.
/// Bottle feeds and blank sides are skipped; the scan stops at the first hit.
pub fn last_breast_side(events: &[FeedEvent]) -> Option<BreastSide> {
    events.iter().rev().find_map(|event| event.side)
}

/// Suggest when to feed next, four hours after the last feed started.
/// Only given from four weeks of age and when a feed has been logged.
pub fn next_feed_suggestion(
    last_feed_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    age_weeks: Option<i64>,
) -> Option<String> {
    let last_feed_start = last_feed_start?;
    let age_weeks = age_weeks?;
    if age_weeks < FEED_SUGGESTION_MIN_AGE_WEEKS {
        return None;
    }

    let next_feed = last_feed_start + Duration::hours(FEED_INTERVAL_HOURS);
    let remaining = next_feed - now;
    if remaining > Duration::zero() {
        Some(format!("Next feeding in about {}", format_elapsed(remaining)))
    } else {
        Some("It's time for the next feeding!".to_string())
    }
}
