pub mod dashboard_mapper;
pub mod feed_mapper;
pub mod profile_mapper;
pub mod sleep_mapper;
pub mod tracker_mapper;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::models::timestamp::parse_local_timestamp;
use crate::domain::ValidationError;

/// Placeholder shown for values that cannot be computed yet
pub const MISSING: &str = "N/A";

/// Parse browser input in the caller's zone; bad input is a validation error
pub(crate) fn parse_input(field: &str, value: &str, zone: Tz) -> Result<DateTime<Utc>, ValidationError> {
    parse_local_timestamp(value, zone)
        .map_err(|e| ValidationError::new(format!("Invalid {}: {}", field, e)))
}
