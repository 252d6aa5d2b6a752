use chrono_tz::Tz;
use shared::{FeedEntry, FeedListResponse, LogFeedRequest};

use super::parse_input;
use crate::domain::commands::feed::LogFeedCommand;
use crate::domain::models::timestamp::format_in_zone;
use crate::domain::models::FeedEvent;
use crate::domain::ValidationError;

pub struct FeedMapper;

impl FeedMapper {
    /// Convert a request whose times are wall-clock times in `zone`.
    /// A missing end means the feed is recorded as an instant; a missing amount is zero.
    pub fn to_log_command(request: LogFeedRequest, zone: Tz) -> Result<LogFeedCommand, ValidationError> {
        let start = parse_input("feed start", &request.start, zone)?;
        let end = match request.end.as_deref().map(str::trim) {
            Some(end) if !end.is_empty() => parse_input("feed end", end, zone)?,
            _ => start,
        };

        Ok(LogFeedCommand {
            kind: request.kind,
            start,
            end,
            amount_ounces: request.amount_ounces.unwrap_or(0.0),
            side: request.side,
            notes: request.notes,
        })
    }

    pub fn to_dto(event: &FeedEvent, zone: Tz) -> FeedEntry {
        FeedEntry {
            id: event.id.clone(),
            kind: event.kind,
            start: format_in_zone(&event.start, zone),
            end: format_in_zone(&event.end, zone),
            amount_ounces: event.amount_ounces,
            side: event.side,
            notes: event.notes.clone(),
        }
    }

    pub fn to_list_response(events: &[FeedEvent], zone: Tz) -> FeedListResponse {
        FeedListResponse {
            entries: events.iter().map(|e| Self::to_dto(e, zone)).collect(),
        }
    }
}
