//! # Advice Engine
//!
//! Turns the baby's age and the event logs into a short recommendation. The
//! engine is a fixed, ordered list of rules; each rule contributes at most one
//! sentence and the sentences are joined with single spaces:
//!
//! 1. Age band (always, exactly one of four)
//! 2. Night sleep (from 8 weeks)
//! 3. Total sleep shortfall (under 8 weeks, below 14h in the last 24h)
//! 4. Daytime feeding spacing (from 4 weeks)
//! 5. Daily volume shortfall (from 4 weeks, below 24oz in the last 24h)
//! 6. Which breast to offer next (when a side is known)
//!
//! Day and night boundaries are evaluated on the household clock (`zone`).

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use shared::BreastSide;

use super::aggregator::{last_breast_side, rolling_feed_totals, rolling_sleep_hours, round_to};
use super::models::timestamp::{instant_at, local_date};
use super::models::{FeedEvent, SleepEvent};

pub const NEWBORN_ADVICE: &str = "Focus on feeding and bonding. Track weight gain and daily ounces.";
pub const SCHEDULE_ADVICE: &str = "Establish 4 daytime feedings every 4 hours. Notice sleep patterns.";
pub const NIGHT_WEANING_ADVICE: &str = "Gradually reduce night feedings. Strengthen bedtime routine.";
pub const MAINTENANCE_ADVICE: &str = "Maintain 12-hour night sleep. Celebrate your progress!";

pub const NIGHT_SLEEP_GOAL_MESSAGE: &str = "Great job! Baby achieving ~12h night sleep.";
pub const LOG_MORE_FEEDS_MESSAGE: &str = "Log more daytime feedings for schedule analysis";

const NIGHT_START_HOUR: u32 = 19;
const NIGHT_LENGTH_HOURS: i64 = 12;
const NIGHT_SLEEP_GOAL_HOURS: f64 = 11.5;
const NIGHT_SLEEP_PROGRESS_HOURS: f64 = 8.0;

const DAY_START_HOUR: u32 = 7;
const DAY_END_HOUR: u32 = 19;
const GOOD_SPACING_MIN_HOURS: f64 = 3.5;
const GOOD_SPACING_MAX_HOURS: f64 = 4.5;

const MIN_DAILY_SLEEP_HOURS: f64 = 14.0;
const MIN_DAILY_OUNCES: f64 = 24.0;

const SCHEDULE_AGE_WEEKS: i64 = 4;
const NIGHT_AGE_WEEKS: i64 = 8;
const MAINTENANCE_AGE_WEEKS: i64 = 12;

/// Clock inputs for advice generation
#[derive(Debug, Clone, Copy)]
pub struct AdviceContext {
    pub now: DateTime<Utc>,
    /// Household zone used for "today", night and daytime boundaries
    pub zone: Tz,
}

/// Canonical advice for an age band: [0,4), [4,8), [8,12), [12,∞) weeks
pub fn age_band_advice(age_weeks: i64) -> &'static str {
    match age_weeks {
        w if w < SCHEDULE_AGE_WEEKS => NEWBORN_ADVICE,
        w if w < NIGHT_AGE_WEEKS => SCHEDULE_ADVICE,
        w if w < MAINTENANCE_AGE_WEEKS => NIGHT_WEANING_ADVICE,
        _ => MAINTENANCE_ADVICE,
    }
}

/// Longest overlap, in hours, of any single sleep with tonight's 19:00-07:00 window
pub fn longest_night_sleep_hours(events: &[SleepEvent], context: &AdviceContext) -> f64 {
    let today = local_date(&context.now, context.zone);
    let night_start = instant_at(
        today,
        NaiveTime::from_hms_opt(NIGHT_START_HOUR, 0, 0).unwrap_or_default(),
        context.zone,
    );
    let night_end = night_start + Duration::hours(NIGHT_LENGTH_HOURS);

    events
        .iter()
        .filter(|event| event.end > night_start && event.start < night_end)
        .map(|event| {
            let overlap = event.end.min(night_end) - event.start.max(night_start);
            overlap.num_seconds() as f64 / 3600.0
        })
        .fold(0.0, f64::max)
}

/// Night sleep tier message for a measured number of hours
pub fn night_sleep_message(hours: f64) -> String {
    if hours >= NIGHT_SLEEP_GOAL_HOURS {
        NIGHT_SLEEP_GOAL_MESSAGE.to_string()
    } else if hours >= NIGHT_SLEEP_PROGRESS_HOURS {
        format!("Night sleep: {:.1}h - aim for 12h gradually.", hours)
    } else {
        format!("Night sleep: {:.1}h - focus on reducing night feeds.", hours)
    }
}

/// Average gap, in hours, between consecutive daytime (07:00-19:00) feeds.
/// `None` when fewer than two daytime feeds exist.
pub fn average_daytime_feed_gap_hours(events: &[FeedEvent], zone: Tz) -> Option<f64> {
    let mut daytime: Vec<DateTime<Utc>> = events
        .iter()
        .map(|event| event.start)
        .filter(|start| {
            let hour = start.with_timezone(&zone).hour();
            (DAY_START_HOUR..DAY_END_HOUR).contains(&hour)
        })
        .collect();
    daytime.sort();

    let gaps: Vec<f64> = daytime
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 3600.0)
        .collect();

    if gaps.is_empty() {
        None
    } else {
        Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
    }
}

/// Feeding spacing message
pub fn feeding_schedule_message(events: &[FeedEvent], zone: Tz) -> String {
    match average_daytime_feed_gap_hours(events, zone) {
        None => LOG_MORE_FEEDS_MESSAGE.to_string(),
        Some(avg) if (GOOD_SPACING_MIN_HOURS..=GOOD_SPACING_MAX_HOURS).contains(&avg) => {
            format!("Good feeding spacing: avg {:.1}h", avg)
        }
        Some(avg) => format!("Adjust feeding spacing: current avg {:.1}h", avg),
    }
}

/// Reminder about which breast to offer next
pub fn side_reminder(side: BreastSide) -> &'static str {
    match side {
        BreastSide::Left => "Last feeding was left breast - consider right next.",
        BreastSide::Right => "Last feeding was right breast - consider left next.",
        BreastSide::Both => "Both breasts used last feeding - monitor baby's fullness.",
    }
}

/// Build the full advice string.
///
/// Returns `None` when the age is unknown or negative, or when no rule produced
/// a sentence.
pub fn generate_advice(
    age_weeks: Option<i64>,
    sleep_events: &[SleepEvent],
    feed_events: &[FeedEvent],
    context: &AdviceContext,
) -> Option<String> {
    let age_weeks = age_weeks.filter(|weeks| *weeks >= 0)?;

    let mut fragments: Vec<String> = vec![age_band_advice(age_weeks).to_string()];

    if age_weeks >= NIGHT_AGE_WEEKS {
        let longest = longest_night_sleep_hours(sleep_events, context);
        fragments.push(night_sleep_message(longest));
    }

    let total_sleep = round_to(rolling_sleep_hours(sleep_events, context.now), 1);
    if age_weeks < NIGHT_AGE_WEEKS && total_sleep < MIN_DAILY_SLEEP_HOURS {
        fragments.push(format!(
            "Aim for 14-17 hours total sleep daily. Current: {:.1}h",
            total_sleep
        ));
    }

    if age_weeks >= SCHEDULE_AGE_WEEKS {
        fragments.push(feeding_schedule_message(feed_events, context.zone));

        let totals = rolling_feed_totals(feed_events, context.now);
        if totals.ounces < MIN_DAILY_OUNCES {
            fragments.push(format!("Daily intake below 24oz. Current: {:.1}oz", totals.ounces));
        }
    }

    if let Some(side) = last_breast_side(feed_events) {
        fragments.push(side_reminder(side).to_string());
    }

    let advice = fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!advice.is_empty()).then_some(advice)
}
