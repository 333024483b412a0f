//! Member records and their public representation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Stored member record, keyed by `email`.
///
/// `password` always holds an Argon2id digest. This type is deliberately not
/// `Serialize`; responses go through [`MemberProfile`], which has no password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub email: String,
    pub password: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: String,
    pub subscribed: bool,
}

/// Member as returned by the API, with the derived `age`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub email: String,
    pub name: String,
    #[schema(value_type = String, format = Date, example = "2000-01-01")]
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: String,
    pub subscribed: bool,
    pub age: u32,
}

impl Member {
    /// Render the public profile with `age` computed as of `today`.
    #[must_use]
    pub fn profile_on(&self, today: NaiveDate) -> MemberProfile {
        MemberProfile {
            email: self.email.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            address: self.address.clone(),
            subscribed: self.subscribed,
            age: age_on(self.date_of_birth, today),
        }
    }

    #[must_use]
    pub fn profile(&self) -> MemberProfile {
        self.profile_on(Utc::now().date_naive())
    }
}

/// Completed years between `date_of_birth` and `today`.
///
/// The year is only counted once the birthday has been reached. Birth dates
/// in the future yield 0.
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping only the date.
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD or RFC 3339"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        let dob = date(2000, 6, 15);
        assert_eq!(age_on(dob, date(2026, 6, 14)), 25);
        assert_eq!(age_on(dob, date(2026, 6, 15)), 26);
        assert_eq!(age_on(dob, date(2026, 12, 31)), 26);
    }

    #[test]
    fn age_of_future_birth_date_is_zero() {
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 1, 1)), 0);
    }

    #[test]
    fn age_on_leap_day() {
        let dob = date(2004, 2, 29);
        assert_eq!(age_on(dob, date(2025, 2, 28)), 20);
        assert_eq!(age_on(dob, date(2025, 3, 1)), 21);
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2000-01-01").unwrap(), date(2000, 1, 1));
        assert_eq!(
            parse_date("2000-01-01T00:00:00Z").unwrap(),
            date(2000, 1, 1)
        );
        assert_eq!(
            parse_date("1999-12-31T23:30:00-05:00").unwrap(),
            date(1999, 12, 31)
        );
        assert!(parse_date("01/01/2000").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn profile_omits_password() {
        let member = Member {
            email: "a@b.com".to_string(),
            password: "$argon2id$digest".to_string(),
            name: "A".to_string(),
            date_of_birth: date(2000, 1, 1),
            gender: "F".to_string(),
            address: "X".to_string(),
            subscribed: true,
        };

        let profile = member.profile_on(date(2026, 10, 17));
        assert_eq!(profile.age, 26);

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["date_of_birth"], "2000-01-01");
    }
}
