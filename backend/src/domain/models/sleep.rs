//! Domain model for a logged sleep interval.
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct SleepEvent {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepEvent {
    pub const ID_PREFIX: &'static str = "sleep";

    /// Generate a sleep event ID in format "sleep::<epoch_millis>"
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("{}::{}", Self::ID_PREFIX, epoch_millis)
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }
}
