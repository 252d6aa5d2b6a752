//! Domain model for a logged feeding.
use chrono::{DateTime, Utc};
use shared::{BreastSide, FeedKind};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub id: String,
    pub kind: FeedKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub amount_ounces: f64,
    /// Blank in storage for bottle feeds or when the side was not recorded
    pub side: Option<BreastSide>,
    pub notes: String,
}

impl FeedEvent {
    pub const ID_PREFIX: &'static str = "feed";

    /// Generate a feed event ID in format "feed::<epoch_millis>"
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("{}::{}", Self::ID_PREFIX, epoch_millis)
    }
}
