//! Assembles everything the dashboard shows from the current logs.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::BreastSide;
use tracing::info;

use super::advice::{generate_advice, AdviceContext};
use super::aggregator::{
    last_breast_side, last_feed_info, last_sleep_info, next_feed_suggestion, rolling_feed_totals,
    rolling_sleep_hours, round_to, FeedTotals, LastEventInfo,
};
use super::models::timestamp::local_date;
use super::models::{FeedEvent, Profile, SleepEvent};
use super::sleep_tracker::SleepTracker;
use super::{FeedLogService, ProfileService, SleepLogService, SleepTrackerService};

/// Number of most recent log entries listed on the dashboard
pub const RECENT_ENTRY_COUNT: usize = 5;

/// Derived view of all logs at one instant
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub zone: Tz,
    pub profile: Option<Profile>,
    pub age_days: Option<i64>,
    pub age_weeks: Option<i64>,
    pub advice: Option<String>,
    pub last_feed: Option<LastEventInfo>,
    pub last_sleep: Option<LastEventInfo>,
    /// Rounded to two decimals
    pub total_sleep_hours: f64,
    pub feed_totals: FeedTotals,
    pub next_feed_suggestion: Option<String>,
    pub last_breast_side: Option<BreastSide>,
    pub tracker: SleepTracker,
    /// Last entries in log order
    pub recent_sleep: Vec<SleepEvent>,
    pub recent_feeds: Vec<FeedEvent>,
}

#[derive(Clone)]
pub struct DashboardService {
    profile_service: ProfileService,
    sleep_log_service: SleepLogService,
    feed_log_service: FeedLogService,
    tracker_service: SleepTrackerService,
}

impl DashboardService {
    pub fn new(
        profile_service: ProfileService,
        sleep_log_service: SleepLogService,
        feed_log_service: FeedLogService,
        tracker_service: SleepTrackerService,
    ) -> Self {
        Self {
            profile_service,
            sleep_log_service,
            feed_log_service,
            tracker_service,
        }
    }

    /// Build the dashboard as of `now`, with "today" and day/night boundaries
    /// taken in `zone`.
    pub async fn build_dashboard(&self, zone: Tz, now: DateTime<Utc>) -> Result<Dashboard> {
        info!("Building dashboard for zone {}", zone.name());

        let profile = self.profile_service.get_profile().await?;
        let sleep_events = self.sleep_log_service.list_sleep().await?;
        let feed_events = self.feed_log_service.list_feeds().await?;
        let tracker = self.tracker_service.status().await?;

        let today = local_date(&now, zone);
        let age_days = profile.as_ref().and_then(|p| p.age_days(today));
        let age_weeks = profile.as_ref().and_then(|p| p.age_weeks(today));

        let context = AdviceContext { now, zone };
        let advice = generate_advice(age_weeks, &sleep_events, &feed_events, &context);

        let last_feed = last_feed_info(&feed_events, now);
        let next_feed_suggestion =
            next_feed_suggestion(last_feed.as_ref().map(|info| info.at), now, age_weeks);

        let dashboard = Dashboard {
            zone,
            age_days,
            age_weeks,
            advice,
            last_sleep: last_sleep_info(&sleep_events, now),
            total_sleep_hours: round_to(rolling_sleep_hours(&sleep_events, now), 2),
            feed_totals: rolling_feed_totals(&feed_events, now),
            next_feed_suggestion,
            last_breast_side: last_breast_side(&feed_events),
            tracker,
            recent_sleep: tail(&sleep_events),
            recent_feeds: tail(&feed_events),
            last_feed,
            profile,
        };

        info!(
            "Dashboard: {:.2}h sleep, {} feeds in last 24h",
            dashboard.total_sleep_hours, dashboard.feed_totals.count
        );
        Ok(dashboard)
    }
}

fn tail<T: Clone>(events: &[T]) -> Vec<T> {
    events[events.len().saturating_sub(RECENT_ENTRY_COUNT)..].to_vec()
}
