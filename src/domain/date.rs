//! APOD date validation.
//!
//! The archive starts on 1995-06-16; nothing after today exists yet.

use chrono::{Local, NaiveDate};
use thiserror::Error;

/// Date of the first Astronomy Picture of the Day
pub const FIRST_APOD_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1995, 6, 16) {
    Some(date) => date,
    None => panic!("invalid first APOD date"),
};

/// A date argument that cannot be requested from the archive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDate {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Unparseable(String),

    #[error("APOD date cannot be before {first} (got {date})")]
    BeforeFirst { date: NaiveDate, first: NaiveDate },

    #[error("APOD date cannot be in the future (got {date}, today is {today})")]
    InFuture { date: NaiveDate, today: NaiveDate },
}

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Check that `date` lies within `FIRST_APOD_DATE..=today`
pub fn validate(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, InvalidDate> {
    if date < FIRST_APOD_DATE {
        return Err(InvalidDate::BeforeFirst {
            date,
            first: FIRST_APOD_DATE,
        });
    }
    if date > today {
        return Err(InvalidDate::InFuture { date, today });
    }
    Ok(date)
}

/// Resolve an optional `YYYY-MM-DD` argument, defaulting to `today`
pub fn resolve(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate, InvalidDate> {
    let date = match arg {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| InvalidDate::Unparseable(raw.to_string()))?,
        None => today,
    };
    validate(date, today)
}
