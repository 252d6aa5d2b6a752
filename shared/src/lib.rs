use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of feeding session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Breast,
    Bottle,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Breast => "breast",
            FeedKind::Bottle => "bottle",
        }
    }

    /// Parse the stored/form representation ("breast" or "bottle", case-insensitive)
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "breast" => Ok(FeedKind::Breast),
            "bottle" => Ok(FeedKind::Bottle),
            other => Err(format!("Unknown feed kind: '{}'", other)),
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breast used during a feeding. Bottle feeds and unknown sides carry no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreastSide {
    Left,
    Right,
    Both,
}

impl BreastSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreastSide::Left => "Left",
            BreastSide::Right => "Right",
            BreastSide::Both => "Both",
        }
    }

    /// Parse a side column value. Blank means "no side" and yields `Ok(None)`.
    pub fn parse_optional(value: &str) -> Result<Option<Self>, String> {
        match value.trim() {
            "" => Ok(None),
            "Left" => Ok(Some(BreastSide::Left)),
            "Right" => Ok(Some(BreastSide::Right)),
            "Both" => Ok(Some(BreastSide::Both)),
            other => Err(format!("Unknown breast side: '{}'", other)),
        }
    }
}

impl fmt::Display for BreastSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baby profile as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub birthdate: String, // ISO 8601 date format (YYYY-MM-DD)
}

/// Request for saving (overwriting) the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveProfileRequest {
    pub name: String,
    pub birthdate: String, // ISO 8601 date format (YYYY-MM-DD)
}

/// Response containing the profile and the derived age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
    pub age_days: Option<i64>,
    pub age_weeks: Option<i64>,
}

/// A logged sleep interval, with times rendered in the requested display zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: String,
    pub start: String,
    pub end: String,
}

/// Request for logging a sleep interval.
///
/// Times use the `YYYY-MM-DDTHH:MM` format of an HTML `datetime-local` input and
/// are interpreted in `timezone` (IANA name). The server default zone is used when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSleepRequest {
    pub start: String,
    pub end: String,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepListResponse {
    pub entries: Vec<SleepEntry>,
}

/// A logged feeding, with times rendered in the requested display zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: String,
    pub kind: FeedKind,
    pub start: String,
    pub end: String,
    pub amount_ounces: f64,
    pub side: Option<BreastSide>,
    pub notes: String,
}

/// Request for logging a feeding. `end` defaults to `start` when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFeedRequest {
    pub kind: FeedKind,
    pub start: String,
    pub end: Option<String>,
    pub amount_ounces: Option<f64>,
    pub side: Option<BreastSide>,
    #[serde(default)]
    pub notes: String,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedListResponse {
    pub entries: Vec<FeedEntry>,
}

/// Response for a delete call. Unknown ids are not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub deleted: bool,
}

/// State of the in-progress sleep tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    Idle,
    Started,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerStatus {
    pub state: TrackerState,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Request for committing an ended sleep session, possibly with edited times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmSleepRequest {
    pub start: String,
    pub end: String,
    pub timezone: Option<String>,
}

/// Response after committing a pending sleep session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmSleepResponse {
    pub entry: SleepEntry,
    pub tracker: TrackerStatus,
}

/// Everything the dashboard needs in one payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub timezone: String,
    pub profile: Option<Profile>,
    pub age_days: Option<i64>,
    pub age_weeks: Option<i64>,
    pub advice: Option<String>,
    pub last_feed_time: String,
    pub last_feed_ago: String,
    pub last_sleep_end: String,
    pub last_sleep_ago: String,
    pub total_sleep_24h: f64,
    pub total_feeds_24h: usize,
    pub total_ounces_24h: f64,
    pub next_feed_suggestion: Option<String>,
    pub last_breast_side: Option<BreastSide>,
    pub tracker: TrackerStatus,
    pub recent_sleep: Vec<SleepEntry>,
    pub recent_feeds: Vec<FeedEntry>,
}
