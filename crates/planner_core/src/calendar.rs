use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{PlannerError, PlannerResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|err| PlannerError::InvalidFormat(format!("expected YYYY-MM-DD, got `{raw}`: {err}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Stored custom days use 1 = Monday .. 7 = Sunday; calendar lookups use
/// 0 = Sunday .. 6 = Saturday. Sunday is the only value that moves.
pub fn normalize_custom_day(day: u8) -> u8 {
    if day == 7 {
        0
    } else {
        day
    }
}

pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(i64::from(day_of_week(date)));
    (start, start + Duration::days(6))
}

pub fn week_dates(date: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = week_range(date);
    date_range(start, end)
}

/// Every calendar day from `start` to `end` inclusive; empty when `end < start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
