use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock time within a single day, stored as minutes since local midnight.
///
/// Parsing is the only fallible entry point; once a `ClockTime` exists every
/// layout and streak computation over it is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    pub fn from_hm(hours: u32, minutes: u32) -> PlannerResult<Self> {
        if hours > 23 {
            return Err(PlannerError::OutOfRange(format!(
                "hour {hours} is not within 0..=23"
            )));
        }
        if minutes > 59 {
            return Err(PlannerError::OutOfRange(format!(
                "minute {minutes} is not within 0..=59"
            )));
        }
        Ok(Self((hours * 60 + minutes) as u16))
    }

    pub fn from_minutes_wrapping(minutes: i64) -> Self {
        Self(minutes.rem_euclid(i64::from(MINUTES_PER_DAY)) as u16)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    pub fn to_twelve_hour(self) -> String {
        let period = if self.hour() >= 12 { "PM" } else { "AM" };
        let display_hour = match self.hour() % 12 {
            0 => 12,
            hour => hour,
        };
        format!("{display_hour}:{:02} {period}", self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = PlannerError;

    fn from_str(raw: &str) -> PlannerResult<Self> {
        let invalid = || PlannerError::InvalidFormat(format!("expected HH:MM, got `{raw}`"));
        let (hours, minutes) = raw.trim().split_once(':').ok_or_else(invalid)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        Self::from_hm(hours, minutes)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = PlannerError;

    fn try_from(value: String) -> PlannerResult<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(value: NaiveTime) -> Self {
        Self((value.hour() * 60 + value.minute()) as u16)
    }
}

pub fn time_to_minutes(time: &str) -> PlannerResult<u32> {
    Ok(time.parse::<ClockTime>()?.minutes())
}

pub fn minutes_to_time(minutes: i64) -> String {
    ClockTime::from_minutes_wrapping(minutes).to_string()
}

/// Minutes from `start` to `end`, assuming the interval crosses midnight when
/// `end` is numerically earlier. Always within `0..MINUTES_PER_DAY`.
pub fn calculate_duration(start: ClockTime, end: ClockTime) -> u32 {
    if end < start {
        end.minutes() + MINUTES_PER_DAY - start.minutes()
    } else {
        end.minutes() - start.minutes()
    }
}

pub fn calculate_end_time(start: ClockTime, duration_minutes: u32) -> ClockTime {
    ClockTime::from_minutes_wrapping(i64::from(start.minutes()) + i64::from(duration_minutes))
}

pub fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, mins) => format!("{mins} min"),
        (hours, 0) => format!("{hours} hr"),
        (hours, mins) => format!("{hours}h {mins}m"),
    }
}

pub fn format_time_display(time: &str) -> PlannerResult<String> {
    Ok(time.parse::<ClockTime>()?.to_twelve_hour())
}

/// `7:30 – 9:00 AM` when both ends share a period, `11:00 AM – 1:00 PM` otherwise.
pub fn format_time_range(start: ClockTime, end: ClockTime) -> String {
    let start_label = start.to_twelve_hour();
    let end_label = end.to_twelve_hour();
    let same_period = (start.hour() >= 12) == (end.hour() >= 12);
    if same_period {
        let bare_start = start_label
            .rsplit_once(' ')
            .map(|(clock, _)| clock)
            .unwrap_or(start_label.as_str());
        format!("{bare_start} – {end_label}")
    } else {
        format!("{start_label} – {end_label}")
    }
}

/// Inclusive on both bounds; a sleep time earlier than the wake time means the
/// active window runs past midnight. Equal bounds are a zero-length day.
pub fn is_within_active_hours(time: ClockTime, wake: ClockTime, sleep: ClockTime) -> bool {
    if sleep >= wake {
        time >= wake && time <= sleep
    } else {
        time >= wake || time <= sleep
    }
}

pub fn time_until(target: ClockTime, now: ClockTime) -> (u32, u32) {
    let diff = calculate_duration(now, target);
    (diff / 60, diff % 60)
}

pub fn format_time_until(hours: u32, minutes: u32) -> String {
    match (hours, minutes) {
        (0, mins) => format!("{mins}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, mins) => format!("{hours}h {mins}m"),
    }
}

pub fn is_time_past(time: ClockTime, now: ClockTime) -> bool {
    now > time
}
