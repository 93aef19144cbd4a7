//! Clock-time and calendar-date primitives.
//!
//! Every interface boundary uses two textual forms: `"HH:MM"` (24-hour,
//! zero-padded) for times and `"YYYY-MM-DD"` for dates. Both are part of the
//! contract, so parsing is strict and formatting is canonical.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A clock time expressed as minutes since midnight.
///
/// Valid values run from `00:00` to `24:00` inclusive. `24:00` only makes
/// sense as a closing time; no slot can start there because nothing fits
/// after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const NOON: TimeOfDay = TimeOfDay(12 * 60);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY as u16);

    /// Build a time from minutes, saturating at `24:00`.
    pub const fn clamped(minutes: u16) -> Self {
        if minutes > MINUTES_PER_DAY as u16 {
            TimeOfDay(MINUTES_PER_DAY as u16)
        } else {
            TimeOfDay(minutes)
        }
    }

    /// Build a time from minutes since midnight.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTime` when `minutes` exceeds `24:00`.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidTime(format_minutes(minutes)));
        }
        Ok(TimeOfDay(minutes as u16))
    }

    /// Build a time from an hour and minute pair.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(ScheduleError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    /// Shift forward by `minutes`, or `None` if the result passes `24:00`.
    pub fn checked_add(self, minutes: u32) -> Option<TimeOfDay> {
        let total = self.minutes().checked_add(minutes)?;
        (total <= MINUTES_PER_DAY).then_some(TimeOfDay(total as u16))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());

        let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u32 = hh.parse().map_err(|_| invalid())?;
        let minute: u32 = mm.parse().map_err(|_| invalid())?;
        TimeOfDay::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Parse `"HH:MM"` into minutes since midnight.
///
/// # Errors
/// Returns `ScheduleError::InvalidTime` for non-numeric parts, a missing
/// colon, non-padded fields, or an hour/minute out of range. Nothing is
/// wrapped or truncated.
pub fn to_minutes(time: &str) -> Result<u32> {
    time.parse::<TimeOfDay>().map(TimeOfDay::minutes)
}

/// Format minutes since midnight as zero-padded `"HH:MM"`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse a canonical `"YYYY-MM-DD"` date.
///
/// # Errors
/// Returns `ScheduleError::InvalidDate` when the string is not exactly in
/// canonical form or names a day that does not exist.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let bytes = date.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(ScheduleError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(date.to_string()))
}

/// Serde adapter for `NaiveDate` fields that only accepts the canonical
/// `"YYYY-MM-DD"` form. Use with `#[serde(with = "crate::time::canonical_date")]`.
pub mod canonical_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}
