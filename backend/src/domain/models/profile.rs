//! Domain model for the baby profile.
use chrono::NaiveDate;

use super::timestamp::DATE_FORMAT;

/// Singleton profile record. The birthdate is kept exactly as stored so that a
/// malformed value survives a load/save cycle; it is parsed when age is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub birthdate: String,
}

impl Profile {
    /// Parsed birthdate, or `None` when the stored value is not `YYYY-MM-DD`
    pub fn birthdate_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.birthdate.trim(), DATE_FORMAT).ok()
    }

    /// Age in whole days on `today`. `None` if the birthdate is unparsable or in the future.
    pub fn age_days(&self, today: NaiveDate) -> Option<i64> {
        let birthdate = self.birthdate_date()?;
        let days = (today - birthdate).num_days();
        (days >= 0).then_some(days)
    }

    /// Age in completed weeks: `floor((today - birthdate) / 7 days)`
    pub fn age_weeks(&self, today: NaiveDate) -> Option<i64> {
        self.age_days(today).map(|days| days / 7)
    }
}
