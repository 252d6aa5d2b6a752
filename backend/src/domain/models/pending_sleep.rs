//! Domain model for a sleep session that has been started but not yet committed.
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use super::timestamp::{format_timestamp, parse_timestamp};

const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSleep {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl PendingSleep {
    /// Encode as `start` or `start|end`
    pub fn encode(&self) -> String {
        match &self.end {
            Some(end) => format!("{}{}{}", format_timestamp(&self.start), SEPARATOR, format_timestamp(end)),
            None => format_timestamp(&self.start),
        }
    }

    pub fn decode(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(anyhow!("Pending sleep value is empty"));
        }

        match value.split_once(SEPARATOR) {
            Some((start, end)) => Ok(Self {
                start: parse_timestamp(start)?,
                end: Some(parse_timestamp(end)?),
            }),
            None => Ok(Self {
                start: parse_timestamp(value)?,
                end: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_started_and_ended() {
        let started = PendingSleep {
            start: parse_timestamp("2025-01-01T20:00").unwrap(),
            end: None,
        };
        assert_eq!(started.encode(), "2025-01-01T20:00");

        let ended = PendingSleep {
            end: Some(parse_timestamp("2025-01-02T06:30").unwrap()),
            ..started
        };
        assert_eq!(ended.encode(), "2025-01-01T20:00|2025-01-02T06:30");
        assert_eq!(PendingSleep::decode(&ended.encode()).unwrap(), ended);
    }

    #[test]
    fn test_decode_rejects_malformed_values() {
        assert!(PendingSleep::decode("").is_err());
        assert!(PendingSleep::decode("2025-01-01T20:00|").is_err());
        assert!(PendingSleep::decode("soon").is_err());
    }
}
