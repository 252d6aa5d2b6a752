use chrono_tz::Tz;
use shared::{ConfirmSleepRequest, TrackerState, TrackerStatus};

use super::parse_input;
use crate::domain::commands::sleep::ConfirmSleepCommand;
use crate::domain::models::timestamp::format_in_zone;
use crate::domain::{SleepTracker, ValidationError};

pub struct TrackerMapper;

impl TrackerMapper {
    pub fn to_status(tracker: SleepTracker, zone: Tz) -> TrackerStatus {
        match tracker {
            SleepTracker::Idle => TrackerStatus {
                state: TrackerState::Idle,
                start: None,
                end: None,
            },
            SleepTracker::Started { start } => TrackerStatus {
                state: TrackerState::Started,
                start: Some(format_in_zone(&start, zone)),
                end: None,
            },
            SleepTracker::Ended { start, end } => TrackerStatus {
                state: TrackerState::Ended,
                start: Some(format_in_zone(&start, zone)),
                end: Some(format_in_zone(&end, zone)),
            },
        }
    }

    pub fn to_confirm_command(
        request: &ConfirmSleepRequest,
        zone: Tz,
    ) -> Result<ConfirmSleepCommand, ValidationError> {
        Ok(ConfirmSleepCommand {
            start: parse_input("sleep start", &request.start, zone)?,
            end: parse_input("sleep end", &request.end, zone)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::timestamp::parse_timestamp;

    #[test]
    fn test_status_rendering() {
        let idle = TrackerMapper::to_status(SleepTracker::Idle, Tz::UTC);
        assert_eq!(idle.state, TrackerState::Idle);
        assert_eq!(idle.start, None);

        let ended = TrackerMapper::to_status(
            SleepTracker::Ended {
                start: parse_timestamp("2025-01-01T20:00").unwrap(),
                end: parse_timestamp("2025-01-02T06:00").unwrap(),
            },
            chrono_tz::Europe::Berlin,
        );
        assert_eq!(ended.state, TrackerState::Ended);
        assert_eq!(ended.start.as_deref(), Some("2025-01-01 21:00"));
        assert_eq!(ended.end.as_deref(), Some("2025-01-02 07:00"));
    }
}
