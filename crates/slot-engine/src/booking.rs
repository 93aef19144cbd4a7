//! Booking validation: turn a requested start time and a service duration
//! into the exact run of slots the appointment will occupy.
//!
//! A run is valid when its start is currently free, enough slots follow it
//! before the day ends, and every consecutive pair of slots is exactly one
//! interval apart. A gap means the run would jump over a break or over a
//! slot someone else already holds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::availability::{self, BookedByBarber, BookedSlots};
use crate::config::EngineConfig;
use crate::error::{BookingError, Result, ScheduleError};
use crate::resolver;
use crate::schedule::{Barber, BarberSelection, ShopSchedule};
use crate::time::TimeOfDay;

/// The duration of the service being booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ServiceRequest {
    duration_minutes: u32,
}

impl ServiceRequest {
    /// # Errors
    /// `ScheduleError::InvalidDuration` for a zero duration.
    pub fn new(duration_minutes: u32) -> Result<Self> {
        if duration_minutes == 0 {
            return Err(ScheduleError::InvalidDuration(0));
        }
        Ok(Self { duration_minutes })
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn slots_needed(&self, granularity: u32) -> usize {
        slots_needed(self.duration_minutes, granularity)
    }
}

impl TryFrom<u32> for ServiceRequest {
    type Error = ScheduleError;

    fn try_from(value: u32) -> Result<Self> {
        ServiceRequest::new(value)
    }
}

impl From<ServiceRequest> for u32 {
    fn from(value: ServiceRequest) -> Self {
        value.duration_minutes
    }
}

/// Number of slots a service of `duration_minutes` occupies:
/// `ceil(duration / granularity)`.
pub fn slots_needed(duration_minutes: u32, granularity: u32) -> usize {
    duration_minutes.div_ceil(granularity.max(1)) as usize
}

/// A contiguous run of slots reserved by one appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotRun(Vec<TimeOfDay>);

impl SlotRun {
    pub fn new(slots: Vec<TimeOfDay>) -> Self {
        Self(slots)
    }

    pub fn slots(&self) -> &[TimeOfDay] {
        &self.0
    }

    pub fn start(&self) -> Option<TimeOfDay> {
        self.0.first().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any slot of this run is already in `booked`.
    pub fn collides_with(&self, booked: &BookedSlots) -> bool {
        self.0.iter().any(|slot| booked.contains(slot))
    }

    pub fn into_vec(self) -> Vec<TimeOfDay> {
        self.0
    }
}

/// The barber chosen for a booking and the run they will serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarberAssignment {
    pub barber_id: String,
    #[serde(with = "crate::time::canonical_date")]
    pub date: NaiveDate,
    pub run: SlotRun,
}

/// Build the run of `slots_needed` slots starting at `start` from the sorted
/// list of currently free slots.
///
/// A `slots_needed` of zero is treated as one.
///
/// # Errors
/// - `SlotNotAvailable` if `start` is not in `available`.
/// - `InsufficientTrailingSlots` if fewer than `slots_needed` slots remain
///   from `start` to the end of the list.
/// - `NonContiguousRun` if two consecutive slots of the run are not exactly
///   `granularity` minutes apart.
pub fn validate_and_build_run(
    start: TimeOfDay,
    slots_needed: usize,
    available: &[TimeOfDay],
    granularity: u32,
) -> std::result::Result<SlotRun, BookingError> {
    let needed = slots_needed.max(1);

    let index = available
        .iter()
        .position(|slot| *slot == start)
        .ok_or(BookingError::SlotNotAvailable)?;

    let required = available
        .get(index..)
        .and_then(|rest| rest.get(..needed))
        .ok_or(BookingError::InsufficientTrailingSlots)?;
    let contiguous = required
        .windows(2)
        .all(|pair| pair[1].minutes().checked_sub(pair[0].minutes()) == Some(granularity));
    if !contiguous {
        return Err(BookingError::NonContiguousRun);
    }

    Ok(SlotRun(required.to_vec()))
}

/// Validate a run for one specific barber.
///
/// # Errors
/// `DayUnavailable` when the barber does not work on `date`; otherwise any
/// error of [`validate_and_build_run`].
pub fn validate_for_barber(
    date: NaiveDate,
    start: TimeOfDay,
    slots_needed: usize,
    barber: &Barber,
    shop: &ShopSchedule,
    booked: &BookedSlots,
    granularity: u32,
) -> std::result::Result<BarberAssignment, BookingError> {
    let window = resolver::resolve_for_barber(date, barber, shop)
        .ok_or(BookingError::DayUnavailable)?;
    let available = availability::free_slots(Some(&window), booked, granularity);
    let run = validate_and_build_run(start, slots_needed, &available, granularity)?;
    Ok(BarberAssignment {
        barber_id: barber.id.clone(),
        date,
        run,
    })
}

/// Find the first barber, in list order, whose own day can hold the run.
///
/// Each barber is checked against their own grid and booked slots, never the
/// union. No load balancing: the earliest barber in `barbers` wins.
///
/// # Errors
/// `NoBarberAvailable` when no barber can take the run.
pub fn assign_any_barber(
    date: NaiveDate,
    start: TimeOfDay,
    slots_needed: usize,
    barbers: &[Barber],
    shop: &ShopSchedule,
    booked_by_barber: &BookedByBarber,
    granularity: u32,
) -> std::result::Result<BarberAssignment, BookingError> {
    let empty = BookedSlots::new();
    for barber in barbers {
        let booked = booked_by_barber.get(&barber.id).unwrap_or(&empty);
        match validate_for_barber(date, start, slots_needed, barber, shop, booked, granularity) {
            Ok(assignment) => {
                tracing::debug!(barber = %barber.id, %date, %start, "assigned any-barber booking");
                return Ok(assignment);
            }
            Err(reason) => {
                tracing::debug!(
                    barber = %barber.id,
                    %date,
                    %start,
                    %reason,
                    "barber cannot take booking"
                );
            }
        }
    }
    Err(BookingError::NoBarberAvailable)
}

/// Validate a booking request for whatever the client selected.
///
/// # Errors
/// `BarberNotSelected` for [`BarberSelection::Unselected`], `UnknownBarber`
/// for an id missing from `barbers`, and the errors of
/// [`validate_for_barber`] / [`assign_any_barber`].
#[allow(clippy::too_many_arguments)]
pub fn validate_booking(
    date: NaiveDate,
    selection: &BarberSelection,
    start: TimeOfDay,
    service: ServiceRequest,
    barbers: &[Barber],
    shop: &ShopSchedule,
    booked_by_barber: &BookedByBarber,
    config: &EngineConfig,
) -> std::result::Result<BarberAssignment, BookingError> {
    let granularity = config.granularity_minutes;
    let needed = service.slots_needed(granularity);

    let outcome = match selection {
        BarberSelection::Unselected => Err(BookingError::BarberNotSelected),
        BarberSelection::AnyBarber => assign_any_barber(
            date,
            start,
            needed,
            barbers,
            shop,
            booked_by_barber,
            granularity,
        ),
        BarberSelection::SpecificBarber(id) => {
            let barber = availability::find_barber(barbers, id)?;
            let empty = BookedSlots::new();
            let booked = booked_by_barber.get(id).unwrap_or(&empty);
            validate_for_barber(date, start, needed, barber, shop, booked, granularity)
        }
    };

    if let Err(reason) = &outcome {
        tracing::debug!(%date, %start, code = reason.code(), "booking rejected");
    }
    outcome
}
