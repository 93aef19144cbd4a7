//! Free-slot computation for a single barber or for "any barber".
//!
//! A barber's free slots are their day grid minus the slots already taken
//! by appointments. The any-barber view is the set union over all barbers:
//! a slot is shown when at least one barber is free at that time. The union
//! does not promise that one barber can serve a multi-slot service; that is
//! re-checked against a concrete barber when the booking is confirmed.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::BookingError;
use crate::grid::{self, DayPeriods};
use crate::resolver;
use crate::schedule::{Barber, BarberSelection, DayWindow, ShopSchedule};
use crate::time::TimeOfDay;

/// Start times already consumed on one barber's day.
pub type BookedSlots = BTreeSet<TimeOfDay>;

/// Booked slots for one date, keyed by barber id.
pub type BookedByBarber = HashMap<String, BookedSlots>;

/// Why a day shows the slots it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No barber in scope works that day.
    Closed,
    /// The day is open but every slot is taken.
    FullyBooked,
    Open,
}

/// Free slots for a day, with their display grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    #[serde(with = "crate::time::canonical_date")]
    pub date: NaiveDate,
    pub status: DayStatus,
    pub slots: Vec<TimeOfDay>,
    pub periods: DayPeriods,
}

impl DayAvailability {
    fn new(date: NaiveDate, any_open: bool, slots: Vec<TimeOfDay>, config: &EngineConfig) -> Self {
        let status = match (any_open, slots.is_empty()) {
            (false, _) => DayStatus::Closed,
            (true, true) => DayStatus::FullyBooked,
            (true, false) => DayStatus::Open,
        };
        let periods = grid::group_slots_with(&slots, &config.periods);
        Self {
            date,
            status,
            slots,
            periods,
        }
    }
}

/// Free slots of one barber's resolved day.
///
/// Returns an empty list when `window` is `None` or every slot is booked.
pub fn free_slots(
    window: Option<&DayWindow>,
    booked: &BookedSlots,
    granularity: u32,
) -> Vec<TimeOfDay> {
    let Some(window) = window else {
        return Vec::new();
    };
    window
        .slots(granularity)
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect()
}

/// Union of every barber's free slots on `date`, ascending and deduplicated.
///
/// # Arguments
///
/// * `barbers` — Every barber eligible for the booking.
/// * `shop` — Shop-wide template and exceptions.
/// * `booked_by_barber` — Booked slots on `date` per barber id; a missing
///   entry means nothing is booked.
/// * `granularity` — Slot length in minutes.
pub fn union_free_slots(
    date: NaiveDate,
    barbers: &[Barber],
    shop: &ShopSchedule,
    booked_by_barber: &BookedByBarber,
    granularity: u32,
) -> Vec<TimeOfDay> {
    union_with_status(date, barbers, shop, booked_by_barber, granularity).1
}

fn union_with_status(
    date: NaiveDate,
    barbers: &[Barber],
    shop: &ShopSchedule,
    booked_by_barber: &BookedByBarber,
    granularity: u32,
) -> (bool, Vec<TimeOfDay>) {
    let empty = BookedSlots::new();
    let mut any_open = false;
    let mut union = BTreeSet::new();

    for barber in barbers {
        let window = resolver::resolve_for_barber(date, barber, shop);
        any_open |= window.is_some();
        let booked = booked_by_barber.get(&barber.id).unwrap_or(&empty);
        union.extend(free_slots(window.as_ref(), booked, granularity));
    }

    (any_open, union.into_iter().collect())
}

/// Availability of a single barber on `date`.
pub fn barber_day(
    date: NaiveDate,
    barber: &Barber,
    shop: &ShopSchedule,
    booked: &BookedSlots,
    config: &EngineConfig,
) -> DayAvailability {
    let window = resolver::resolve_for_barber(date, barber, shop);
    let slots = free_slots(window.as_ref(), booked, config.granularity_minutes);
    DayAvailability::new(date, window.is_some(), slots, config)
}

/// Availability on `date` for whatever the client selected.
///
/// # Errors
/// `BarberNotSelected` for [`BarberSelection::Unselected`], `UnknownBarber`
/// when a specific id is not in `barbers`.
pub fn slots_for_selection(
    date: NaiveDate,
    selection: &BarberSelection,
    barbers: &[Barber],
    shop: &ShopSchedule,
    booked_by_barber: &BookedByBarber,
    config: &EngineConfig,
) -> Result<DayAvailability, BookingError> {
    match selection {
        BarberSelection::Unselected => Err(BookingError::BarberNotSelected),
        BarberSelection::AnyBarber => {
            let (any_open, slots) = union_with_status(
                date,
                barbers,
                shop,
                booked_by_barber,
                config.granularity_minutes,
            );
            Ok(DayAvailability::new(date, any_open, slots, config))
        }
        BarberSelection::SpecificBarber(id) => {
            let barber = find_barber(barbers, id)?;
            let empty = BookedSlots::new();
            let booked = booked_by_barber.get(id).unwrap_or(&empty);
            Ok(barber_day(date, barber, shop, booked, config))
        }
    }
}

/// Dates in `[from, from + days)` with at least one free slot for the
/// selection, for greying out a date picker.
///
/// `booked_by_date` holds each date's booked slots; dates not present are
/// treated as having no bookings.
pub fn open_dates(
    from: NaiveDate,
    days: u32,
    selection: &BarberSelection,
    barbers: &[Barber],
    shop: &ShopSchedule,
    booked_by_date: &HashMap<NaiveDate, BookedByBarber>,
    config: &EngineConfig,
) -> Result<Vec<NaiveDate>, BookingError> {
    let empty = BookedByBarber::new();
    let mut dates = Vec::new();

    for offset in 0..days {
        let Some(date) = from.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let booked = booked_by_date.get(&date).unwrap_or(&empty);
        let day = slots_for_selection(date, selection, barbers, shop, booked, config)?;
        if day.status == DayStatus::Open {
            dates.push(date);
        }
    }

    Ok(dates)
}

pub(crate) fn find_barber<'a>(barbers: &'a [Barber], id: &str) -> Result<&'a Barber, BookingError> {
    barbers
        .iter()
        .find(|b| b.id == id)
        .ok_or_else(|| BookingError::UnknownBarber(id.to_string()))
}
