use shared::DashboardResponse;

use super::feed_mapper::FeedMapper;
use super::profile_mapper::ProfileMapper;
use super::sleep_mapper::SleepMapper;
use super::tracker_mapper::TrackerMapper;
use super::MISSING;
use crate::domain::aggregator::LastEventInfo;
use crate::domain::models::timestamp::format_in_zone;
use crate::domain::Dashboard;

pub struct DashboardMapper;

impl DashboardMapper {
    pub fn to_response(dashboard: Dashboard) -> DashboardResponse {
        let zone = dashboard.zone;
        let (last_feed_time, last_feed_ago) = Self::last_event(dashboard.last_feed.as_ref(), zone);
        let (last_sleep_end, last_sleep_ago) = Self::last_event(dashboard.last_sleep.as_ref(), zone);

        DashboardResponse {
            timezone: zone.name().to_string(),
            profile: dashboard.profile.map(ProfileMapper::to_dto),
            age_days: dashboard.age_days,
            age_weeks: dashboard.age_weeks,
            advice: dashboard.advice,
            last_feed_time,
            last_feed_ago,
            last_sleep_end,
            last_sleep_ago,
            total_sleep_24h: dashboard.total_sleep_hours,
            total_feeds_24h: dashboard.feed_totals.count,
            total_ounces_24h: dashboard.feed_totals.ounces,
            next_feed_suggestion: dashboard.next_feed_suggestion,
            last_breast_side: dashboard.last_breast_side,
            tracker: TrackerMapper::to_status(dashboard.tracker, zone),
            recent_sleep: SleepMapper::to_list_response(&dashboard.recent_sleep, zone).entries,
            recent_feeds: FeedMapper::to_list_response(&dashboard.recent_feeds, zone).entries,
        }
    }

    fn last_event(info: Option<&LastEventInfo>, zone: chrono_tz::Tz) -> (String, String) {
        match info {
            Some(info) => (format_in_zone(&info.at, zone), info.elapsed.clone()),
            None => (MISSING.to_string(), MISSING.to_string()),
        }
    }
}
