//! # IO Layer
//!
//! Translates HTTP into domain calls and back:
//!
//! - [`rest`]: JSON API under `/api`
//! - [`html`]: the server-rendered page at `/` and its form handlers
//!
//! Naive wall-clock input from the browser is converted to UTC here, using the
//! zone the caller asked for; domain results are rendered back in that zone.

pub mod html;
pub mod rest;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::domain::models::timestamp::parse_zone;

/// `?tz=<IANA zone>` query accepted by every read endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ZoneQuery {
    pub tz: Option<String>,
}

/// Zone named by the caller, or the configured default when none was given
pub fn resolve_zone(requested: Option<&str>, default_zone: Tz) -> Tz {
    match requested.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => parse_zone(Some(name)),
        None => default_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_zone() {
        let paris = chrono_tz::Europe::Paris;
        assert_eq!(resolve_zone(None, paris), paris);
        assert_eq!(resolve_zone(Some(" "), paris), paris);
        assert_eq!(resolve_zone(Some("Asia/Tokyo"), paris), chrono_tz::Asia::Tokyo);
        assert_eq!(resolve_zone(Some("Mars/Olympus"), paris), Tz::UTC);
    }
}
