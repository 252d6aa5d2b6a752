//! Timestamp handling.
//!
//! Every instant inside the domain is a `DateTime<Utc>`. Values cross the
//! storage boundary as naive `YYYY-MM-DDTHH:MM` strings that are always
//! interpreted as UTC, and cross the HTTP boundary as naive strings in the
//! caller's display zone. Conversion to and from the display zone only happens
//! here.

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Storage format: minute precision, no offset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Human-facing format used when rendering in a display zone
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format of profile birthdates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_naive(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| anyhow!("Invalid timestamp '{}': expected YYYY-MM-DDTHH:MM", value))
}

/// Parse a stored timestamp (naive, reference zone)
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(parse_naive(value)?.and_utc())
}

/// Format an instant for storage
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a naive timestamp entered in `zone` and normalize it to UTC.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
/// Local times that do not exist (DST spring-forward) are rejected.
pub fn parse_local_timestamp(value: &str, zone: Tz) -> Result<DateTime<Utc>> {
    let naive = parse_naive(value)?;
    local_to_utc(&naive, zone)
        .ok_or_else(|| anyhow!("Timestamp '{}' does not exist in time zone {}", value, zone.name()))
}

/// Resolve a wall-clock time in `zone` to UTC
pub fn local_to_utc(naive: &NaiveDateTime, zone: Tz) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render an instant in the display zone
pub fn format_in_zone(instant: &DateTime<Utc>, zone: Tz) -> String {
    instant.with_timezone(&zone).format(DISPLAY_FORMAT).to_string()
}

/// Render an instant in the display zone, in the format of a `datetime-local` input
pub fn format_input_in_zone(instant: &DateTime<Utc>, zone: Tz) -> String {
    instant.with_timezone(&zone).format(TIMESTAMP_FORMAT).to_string()
}

/// Calendar date of `instant` as seen in `zone`
pub fn local_date(instant: &DateTime<Utc>, zone: Tz) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// UTC instant of a wall-clock time on `date` in `zone`.
/// Falls back to reading the wall-clock time as UTC if it is skipped by a DST jump.
pub fn instant_at(date: NaiveDate, time: NaiveTime, zone: Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    local_to_utc(&naive, zone).unwrap_or_else(|| naive.and_utc())
}

/// Parse an IANA zone name. Absent names mean UTC; unknown names log a warning
/// and fall back to UTC.
pub fn parse_zone(name: Option<&str>) -> Tz {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        None => Tz::UTC,
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            warn!("Unknown time zone '{}', using UTC", name);
            Tz::UTC
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_and_format_roundtrip() {
        let ts = parse_timestamp("2025-03-01T07:45").unwrap();
        assert_eq!(ts.hour(), 7);
        assert_eq!(ts.minute(), 45);
        assert_eq!(format_timestamp(&ts), "2025-03-01T07:45");
    }

    #[test]
    fn test_parse_accepts_seconds() {
        let ts = parse_timestamp("2025-03-01T07:45:30").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-01T07:45");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2025-13-01T07:45").is_err());
    }

    #[test]
    fn test_local_timestamp_is_normalized_to_utc() {
        let zone: Tz = "America/New_York".parse().unwrap();
        // January: EST, UTC-5
        let ts = parse_local_timestamp("2025-01-15T08:00", zone).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-15T13:00");
        assert_eq!(format_in_zone(&ts, zone), "2025-01-15 08:00");
        assert_eq!(format_input_in_zone(&ts, zone), "2025-01-15T08:00");
    }

    #[test]
    fn test_nonexistent_local_time_is_rejected() {
        let zone: Tz = "America/New_York".parse().unwrap();
        // 2025-03-09 02:30 is skipped by the spring-forward jump
        assert!(parse_local_timestamp("2025-03-09T02:30", zone).is_err());
    }

    #[test]
    fn test_parse_zone_fallbacks() {
        assert_eq!(parse_zone(None), Tz::UTC);
        assert_eq!(parse_zone(Some("")), Tz::UTC);
        assert_eq!(parse_zone(Some("Not/AZone")), Tz::UTC);
        assert_eq!(parse_zone(Some("Europe/Paris")), chrono_tz::Europe::Paris);
    }
}
