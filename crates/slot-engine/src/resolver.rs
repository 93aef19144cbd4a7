//! Resolve the effective working window for one barber on one date.
//!
//! Four configuration sources are consulted in a fixed order and the first
//! one that reaches a verdict wins:
//!
//! 1. the barber's exception for that date,
//! 2. the shop's exception for that date,
//! 3. the barber's weekly template entry for that weekday,
//! 4. the shop's weekly template entry for that weekday.
//!
//! A source that has nothing to say (no matching exception, no entry, or an
//! active record missing its open/close) passes to the next one. An
//! explicitly inactive barber day is a verdict: it closes the day even when
//! the shop is open.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::schedule::{
    weekday_key, Barber, DayConfig, DayWindow, Exception, ExceptionStatus, ShopSchedule,
    WeeklyTemplate,
};

/// The configuration level that decided a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    BarberException,
    ShopException,
    BarberTemplate,
    ShopTemplate,
}

impl ConfigSource {
    /// Sources in precedence order, most specific first.
    pub const PRECEDENCE: [ConfigSource; 4] = [
        ConfigSource::BarberException,
        ConfigSource::ShopException,
        ConfigSource::BarberTemplate,
        ConfigSource::ShopTemplate,
    ];
}

/// The outcome of resolving a day: its window (or `None` when closed) and
/// the source that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub window: Option<DayWindow>,
    pub source: ConfigSource,
}

/// The configuration sources for a single barber.
#[derive(Debug, Clone, Copy)]
pub struct DaySources<'a> {
    pub barber_template: Option<&'a WeeklyTemplate>,
    pub barber_exceptions: &'a [Exception],
    pub shop: &'a ShopSchedule,
}

impl<'a> DaySources<'a> {
    pub fn for_barber(barber: &'a Barber, shop: &'a ShopSchedule) -> Self {
        Self {
            barber_template: barber.template.as_ref(),
            barber_exceptions: &barber.exceptions,
            shop,
        }
    }

    /// Sources for the shop alone, as if the barber had no individual setup.
    pub fn shop_only(shop: &'a ShopSchedule) -> Self {
        Self {
            barber_template: None,
            barber_exceptions: &[],
            shop,
        }
    }

    fn decide(&self, source: ConfigSource, date: NaiveDate) -> Option<Option<DayWindow>> {
        match source {
            ConfigSource::BarberException => from_exception(self.barber_exceptions, date),
            ConfigSource::ShopException => from_exception(&self.shop.exceptions, date),
            ConfigSource::BarberTemplate => {
                let entry = self.barber_template?.get(date.weekday())?;
                if !entry.active {
                    return Some(None);
                }
                actionable(entry, date).map(Some)
            }
            // The shop template is the last word: anything unusable is closed.
            ConfigSource::ShopTemplate => Some(
                self.shop
                    .template
                    .get(date.weekday())
                    .and_then(|entry| actionable(entry, date)),
            ),
        }
    }
}

/// Resolve a day and report which source decided it.
pub fn resolve_day(date: NaiveDate, sources: &DaySources<'_>) -> Resolution {
    let (source, window) = ConfigSource::PRECEDENCE
        .into_iter()
        .find_map(|source| sources.decide(source, date).map(|window| (source, window)))
        .unwrap_or((ConfigSource::ShopTemplate, None));

    tracing::debug!(
        %date,
        ?source,
        open = window.is_some(),
        "resolved day configuration"
    );

    Resolution { window, source }
}

/// Resolve the effective window for `date`, or `None` when the day is
/// unavailable.
pub fn resolve_day_config(
    date: NaiveDate,
    barber_template: Option<&WeeklyTemplate>,
    barber_exceptions: &[Exception],
    shop: &ShopSchedule,
) -> Option<DayWindow> {
    let sources = DaySources {
        barber_template,
        barber_exceptions,
        shop,
    };
    resolve_day(date, &sources).window
}

/// Convenience wrapper resolving a [`Barber`]'s day against the shop.
pub fn resolve_for_barber(
    date: NaiveDate,
    barber: &Barber,
    shop: &ShopSchedule,
) -> Option<DayWindow> {
    resolve_day(date, &DaySources::for_barber(barber, shop)).window
}

fn from_exception(exceptions: &[Exception], date: NaiveDate) -> Option<Option<DayWindow>> {
    let exception = exceptions.iter().find(|e| e.date == date)?;
    match exception.status {
        ExceptionStatus::Blocked => Some(None),
        ExceptionStatus::Available => match (exception.open, exception.close) {
            (Some(open), Some(close)) => Some(Some(DayWindow::new(
                open,
                close,
                exception.break_start,
                exception.break_end,
            ))),
            _ => {
                tracing::warn!(%date, "available exception without open/close; falling through");
                None
            }
        },
    }
}

fn actionable(entry: &DayConfig, date: NaiveDate) -> Option<DayWindow> {
    let window = entry.window();
    if entry.active && window.is_none() {
        tracing::warn!(
            %date,
            weekday = weekday_key(date.weekday()),
            "active day without open/close; falling through"
        );
    }
    window
}
