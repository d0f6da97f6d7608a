//! Calendar math for habit recurrence.
//!
//! All dates are naive calendar days in server-local time. Dates cross the
//! store boundary as `YYYY-MM-DD` text; `parse_date` and `format_date` are
//! the only places that translation happens.

use crate::constants::DATE_FORMAT;
use crate::error::AppError;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

/// Current calendar day from the local wall clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| AppError::InvalidInput {
        field: "date",
        reason: format!("'{}' is not a YYYY-MM-DD date", s),
    })
}

/// Parse a weekday name ("Monday", "mon", ...) into a `Weekday`.
pub fn parse_weekday(name: &str) -> Result<Weekday, AppError> {
    name.parse::<Weekday>().map_err(|_| AppError::InvalidInput {
        field: "weekday",
        reason: format!("'{}' is not a weekday name", name),
    })
}

/// Full English name for a weekday, as stored in habit_days rows.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Ordered, inclusive sequence `start, start+inc, start+2*inc, ...` not
/// exceeding `end`. Empty when `start > end`; exactly `[start]` when
/// `start == end`.
///
/// Callers must guarantee a positive increment; non-positive increments
/// produce an empty sequence.
pub fn interval_dates(start: NaiveDate, end: NaiveDate, increment_days: i64) -> Vec<NaiveDate> {
    if increment_days <= 0 {
        return Vec::new();
    }

    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(increment_days);
    }
    dates
}

/// Ordered, inclusive sequence of every date in `[start, end]` whose weekday
/// is in `days`. An empty day set yields an empty sequence.
pub fn weekly_dates(start: NaiveDate, end: NaiveDate, days: &[Weekday]) -> Vec<NaiveDate> {
    if days.is_empty() {
        return Vec::new();
    }

    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        if days.contains(&current.weekday()) {
            dates.push(current);
        }
        current += Duration::days(1);
    }
    dates
}
