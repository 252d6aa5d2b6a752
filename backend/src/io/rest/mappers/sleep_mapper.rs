use chrono_tz::Tz;
use shared::{LogSleepRequest, SleepEntry, SleepListResponse};

use super::parse_input;
use crate::domain::commands::sleep::LogSleepCommand;
use crate::domain::models::timestamp::format_in_zone;
use crate::domain::models::SleepEvent;
use crate::domain::ValidationError;

pub struct SleepMapper;

impl SleepMapper {
    /// Convert a request whose times are wall-clock times in `zone`
    pub fn to_log_command(request: &LogSleepRequest, zone: Tz) -> Result<LogSleepCommand, ValidationError> {
        Ok(LogSleepCommand {
            start: parse_input("sleep start", &request.start, zone)?,
            end: parse_input("sleep end", &request.end, zone)?,
        })
    }

    pub fn to_dto(event: &SleepEvent, zone: Tz) -> SleepEntry {
        SleepEntry {
            id: event.id.clone(),
            start: format_in_zone(&event.start, zone),
            end: format_in_zone(&event.end, zone),
        }
    }

    pub fn to_list_response(events: &[SleepEvent], zone: Tz) -> SleepListResponse {
        SleepListResponse {
            entries: events.iter().map(|e| Self::to_dto(e, zone)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::timestamp::format_timestamp;

    #[test]
    fn test_request_is_normalized_to_utc() {
        let zone: Tz = "America/Los_Angeles".parse().unwrap();
        let request = LogSleepRequest {
            start: "2025-01-01T20:00".to_string(),
            end: "2025-01-02T06:30".to_string(),
            timezone: None,
        };

        let command = SleepMapper::to_log_command(&request, zone).unwrap();
        assert_eq!(format_timestamp(&command.start), "2025-01-02T04:00");
        assert_eq!(format_timestamp(&command.end), "2025-01-02T14:30");

        let entry = SleepMapper::to_dto(
            &SleepEvent {
                id: "sleep::1".to_string(),
                start: command.start,
                end: command.end,
            },
            zone,
        );
        assert_eq!(entry.start, "2025-01-01 20:00");
        assert_eq!(entry.end, "2025-01-02 06:30");
    }

    #[test]
    fn test_bad_time_is_a_validation_error() {
        let request = LogSleepRequest {
            start: "last night".to_string(),
            end: "2025-01-02T06:30".to_string(),
            timezone: None,
        };
        let err = SleepMapper::to_log_command(&request, Tz::UTC).unwrap_err();
        assert!(err.to_string().contains("sleep start"));
    }
}
