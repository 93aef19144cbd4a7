//! Schedule configuration: weekly templates, date exceptions, barbers.
//!
//! These are read-only snapshots supplied by the caller. The engine never
//! mutates them; it only derives working windows and slot lists from them.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::grid;
use crate::time::TimeOfDay;

/// One weekday's working configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayConfig {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<TimeOfDay>,
}

impl DayConfig {
    /// An active day from `open` to `close` with no break.
    pub fn open(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self {
            active: true,
            open: Some(open),
            close: Some(close),
            break_start: None,
            break_end: None,
        }
    }

    /// An explicitly closed day.
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn with_break(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    /// The working window, if this entry is active and has both bounds.
    pub fn window(&self) -> Option<DayWindow> {
        if !self.active {
            return None;
        }
        Some(DayWindow::new(
            self.open?,
            self.close?,
            self.break_start,
            self.break_end,
        ))
    }

    /// Check the consistency rules for an active day.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` when an active day lacks a bound,
    /// opens at or after closing, has only one break bound, or has a break
    /// outside `[open, close]`.
    pub fn validate(&self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let (open, close) = match (self.open, self.close) {
            (Some(open), Some(close)) => (open, close),
            _ => {
                return Err(ScheduleError::InvalidConfig(
                    "active day requires open and close".to_string(),
                ))
            }
        };
        validate_window(open, close, self.break_start, self.break_end)
    }
}

pub(crate) fn validate_window(
    open: TimeOfDay,
    close: TimeOfDay,
    break_start: Option<TimeOfDay>,
    break_end: Option<TimeOfDay>,
) -> Result<()> {
    if open >= close {
        return Err(ScheduleError::InvalidConfig(format!(
            "open {open} must be before close {close}"
        )));
    }
    match (break_start, break_end) {
        (None, None) => Ok(()),
        (Some(bs), Some(be)) => {
            if open <= bs && bs < be && be <= close {
                Ok(())
            } else {
                Err(ScheduleError::InvalidConfig(format!(
                    "break {bs}-{be} must lie within {open}-{close}"
                )))
            }
        }
        _ => Err(ScheduleError::InvalidConfig(
            "break requires both start and end".to_string(),
        )),
    }
}

/// A resolved, actionable working window for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindow {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<TimeOfDay>,
}

impl DayWindow {
    /// Build a window. A break with only one bound is dropped.
    pub fn new(
        open: TimeOfDay,
        close: TimeOfDay,
        break_start: Option<TimeOfDay>,
        break_end: Option<TimeOfDay>,
    ) -> Self {
        let (break_start, break_end) = match (break_start, break_end) {
            (Some(bs), Some(be)) => (Some(bs), Some(be)),
            (None, None) => (None, None),
            (bs, be) => {
                tracing::warn!(?bs, ?be, "ignoring break with a single bound");
                (None, None)
            }
        };
        if open >= close {
            tracing::warn!(%open, %close, "working window opens at or after closing");
        }
        Self {
            open,
            close,
            break_start,
            break_end,
        }
    }

    /// The full slot grid for this window.
    pub fn slots(&self, interval: u32) -> Vec<TimeOfDay> {
        grid::generate_slots(
            self.open,
            self.break_start,
            self.break_end,
            self.close,
            interval,
        )
    }
}

/// The seven weekday entries of a recurring schedule.
///
/// Deserialized templates may omit days; a missing entry means the day is
/// not configured at this level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklyTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayConfig>,
}

impl WeeklyTemplate {
    /// A template with every weekday set to `config`.
    pub fn every_day(config: DayConfig) -> Self {
        let mut template = Self::default();
        for day in ALL_WEEKDAYS {
            template.set(day, config.clone());
        }
        template
    }

    pub fn get(&self, day: Weekday) -> Option<&DayConfig> {
        self.slot(day).as_ref()
    }

    pub fn set(&mut self, day: Weekday, config: DayConfig) {
        *self.slot_mut(day) = Some(config);
    }

    pub fn with(mut self, day: Weekday, config: DayConfig) -> Self {
        self.set(day, config);
        self
    }

    /// Validate every configured day.
    pub fn validate(&self) -> Result<()> {
        for day in ALL_WEEKDAYS {
            if let Some(config) = self.get(day) {
                config.validate().map_err(|e| {
                    ScheduleError::InvalidConfig(format!("{}: {e}", weekday_key(day)))
                })?;
            }
        }
        Ok(())
    }

    fn slot(&self, day: Weekday) -> &Option<DayConfig> {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn slot_mut(&mut self, day: Weekday) -> &mut Option<DayConfig> {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The template key for a weekday.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionStatus {
    Blocked,
    Available,
}

/// A date-specific override of the weekly template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    #[serde(with = "crate::time::canonical_date")]
    pub date: NaiveDate,
    pub status: ExceptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<TimeOfDay>,
    /// Display-only note shown to clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Exception {
    pub fn blocked(date: NaiveDate) -> Self {
        Self {
            date,
            status: ExceptionStatus::Blocked,
            open: None,
            close: None,
            break_start: None,
            break_end: None,
            message: None,
        }
    }

    pub fn available(date: NaiveDate, open: TimeOfDay, close: TimeOfDay) -> Self {
        Self {
            status: ExceptionStatus::Available,
            open: Some(open),
            close: Some(close),
            ..Self::blocked(date)
        }
    }

    pub fn with_break(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check that an `available` exception carries a consistent window.
    pub fn validate(&self) -> Result<()> {
        if self.status == ExceptionStatus::Blocked {
            return Ok(());
        }
        match (self.open, self.close) {
            (Some(open), Some(close)) => {
                validate_window(open, close, self.break_start, self.break_end)
            }
            _ => Err(ScheduleError::InvalidConfig(format!(
                "available exception on {} requires open and close",
                self.date
            ))),
        }
    }
}

/// The shop-wide schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSchedule {
    #[serde(default)]
    pub template: WeeklyTemplate,
    #[serde(default)]
    pub exceptions: Vec<Exception>,
}

/// A barber and their individual schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Individual weekly template; `None` defers fully to the shop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<WeeklyTemplate>,
    #[serde(default)]
    pub exceptions: Vec<Exception>,
}

impl Barber {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template: None,
            exceptions: Vec::new(),
        }
    }

    pub fn with_template(mut self, template: WeeklyTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_exception(mut self, exception: Exception) -> Self {
        self.exceptions.push(exception);
        self
    }
}

/// Which barber a client asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "barberId", rename_all = "snake_case")]
pub enum BarberSelection {
    #[default]
    Unselected,
    AnyBarber,
    SpecificBarber(String),
}
