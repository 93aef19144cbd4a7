//! In-memory appointment ledger with atomic reservation.
//!
//! The pure validators cannot stop two clients from racing for the same
//! slot: both may compute the same free run and both may write it. The
//! ledger closes that gap by re-reading the booked set, validating, and
//! inserting under a single lock acquisition. A reservation is written only
//! if no existing appointment for the same barber and date overlaps it.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::appointments::AppointmentRecord;
use crate::availability::{BookedByBarber, BookedSlots};
use crate::booking::{self, ServiceRequest, SlotRun};
use crate::config::EngineConfig;
use crate::error::BookingError;
use crate::schedule::{Barber, BarberSelection, ShopSchedule};
use crate::time::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub u64);

/// A confirmed appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub barber_id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(with = "crate::time::canonical_date")]
    pub date: NaiveDate,
    pub slots: SlotRun,
}

impl Appointment {
    pub fn record(&self) -> AppointmentRecord {
        AppointmentRecord {
            barber_id: self.barber_id.clone(),
            date: self.date,
            start: self.slots.start(),
            duration_minutes: None,
            slots: self.slots.slots().to_vec(),
        }
    }
}

/// A client's request to book a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(with = "crate::time::canonical_date")]
    pub date: NaiveDate,
    pub selection: BarberSelection,
    pub start: TimeOfDay,
    pub service: ServiceRequest,
}

/// A run to persist for a barber, already chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub barber_id: String,
    pub client_id: String,
    pub service_id: Option<String>,
    pub date: NaiveDate,
    pub slots: SlotRun,
}

#[derive(Debug, Default)]
struct LedgerState {
    next_id: u64,
    appointments: BTreeMap<AppointmentId, Appointment>,
}

impl LedgerState {
    fn booked_for(
        &self,
        barber_id: &str,
        date: NaiveDate,
        skip: Option<AppointmentId>,
    ) -> BookedSlots {
        self.appointments
            .values()
            .filter(|a| Some(a.id) != skip && a.barber_id == barber_id && a.date == date)
            .flat_map(|a| a.slots.slots().iter().copied())
            .collect()
    }

    fn booked_by_barber(&self, date: NaiveDate, skip: Option<AppointmentId>) -> BookedByBarber {
        let mut booked = BookedByBarber::new();
        for a in self
            .appointments
            .values()
            .filter(|a| Some(a.id) != skip && a.date == date)
        {
            booked
                .entry(a.barber_id.clone())
                .or_default()
                .extend(a.slots.slots().iter().copied());
        }
        booked
    }

    fn insert(&mut self, new: NewAppointment) -> Appointment {
        self.next_id += 1;
        let appointment = Appointment {
            id: AppointmentId(self.next_id),
            barber_id: new.barber_id,
            client_id: new.client_id,
            service_id: new.service_id,
            date: new.date,
            slots: new.slots,
        };
        self.appointments.insert(appointment.id, appointment.clone());
        appointment
    }
}

/// Thread-safe appointment store.
#[derive(Debug, Default)]
pub struct BookingLedger {
    state: Mutex<LedgerState>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // The state is only mutated by whole inserts/removes, so a poisoned
        // lock still guards consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.lock().appointments.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appointments on `date`, ordered by id.
    pub fn appointments_on(&self, date: NaiveDate) -> Vec<Appointment> {
        self.lock()
            .appointments
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect()
    }

    pub fn booked_slots(&self, barber_id: &str, date: NaiveDate) -> BookedSlots {
        self.lock().booked_for(barber_id, date, None)
    }

    pub fn booked_by_barber(&self, date: NaiveDate) -> BookedByBarber {
        self.lock().booked_by_barber(date, None)
    }

    /// Persist `new` iff none of its slots is already held by the same
    /// barber on the same date.
    ///
    /// # Errors
    /// `SlotConflict` on overlap, `SlotNotAvailable` for an empty run.
    pub fn reserve(&self, new: NewAppointment) -> Result<Appointment, BookingError> {
        if new.slots.is_empty() {
            return Err(BookingError::SlotNotAvailable);
        }
        let mut state = self.lock();
        let booked = state.booked_for(&new.barber_id, new.date, None);
        if new.slots.collides_with(&booked) {
            tracing::debug!(
                barber = %new.barber_id,
                date = %new.date,
                "reservation conflicts with existing appointment"
            );
            return Err(BookingError::SlotConflict);
        }
        Ok(state.insert(new))
    }

    /// Validate `request` against the latest bookings and persist it, all
    /// under one lock.
    ///
    /// # Errors
    /// Any [`BookingError`] produced by validation.
    pub fn book(
        &self,
        request: &BookingRequest,
        barbers: &[Barber],
        shop: &ShopSchedule,
        config: &EngineConfig,
    ) -> Result<Appointment, BookingError> {
        let mut state = self.lock();
        let booked = state.booked_by_barber(request.date, None);
        let assignment = booking::validate_booking(
            request.date,
            &request.selection,
            request.start,
            request.service,
            barbers,
            shop,
            &booked,
            config,
        )?;
        let appointment = state.insert(NewAppointment {
            barber_id: assignment.barber_id,
            client_id: request.client_id.clone(),
            service_id: request.service_id.clone(),
            date: assignment.date,
            slots: assignment.run,
        });
        tracing::info!(
            id = appointment.id.0,
            barber = %appointment.barber_id,
            date = %appointment.date,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Remove an appointment, returning it if it existed.
    pub fn cancel(&self, id: AppointmentId) -> Option<Appointment> {
        let removed = self.lock().appointments.remove(&id);
        if removed.is_some() {
            tracing::info!(id = id.0, "appointment cancelled");
        }
        removed
    }

    /// Move an appointment to the time described by `request`.
    ///
    /// The appointment's own slots do not block its new position. On failure
    /// the original appointment is left untouched. The id is preserved.
    ///
    /// # Errors
    /// `AppointmentNotFound` for an unknown id, otherwise any validation error.
    pub fn reschedule(
        &self,
        id: AppointmentId,
        request: &BookingRequest,
        barbers: &[Barber],
        shop: &ShopSchedule,
        config: &EngineConfig,
    ) -> Result<Appointment, BookingError> {
        let mut state = self.lock();
        if !state.appointments.contains_key(&id) {
            return Err(BookingError::AppointmentNotFound(id.0));
        }
        let booked = state.booked_by_barber(request.date, Some(id));
        let assignment = booking::validate_booking(
            request.date,
            &request.selection,
            request.start,
            request.service,
            barbers,
            shop,
            &booked,
            config,
        )?;
        let moved = Appointment {
            id,
            barber_id: assignment.barber_id,
            client_id: request.client_id.clone(),
            service_id: request.service_id.clone(),
            date: assignment.date,
            slots: assignment.run,
        };
        state.appointments.insert(id, moved.clone());
        tracing::info!(id = id.0, date = %moved.date, "appointment rescheduled");
        Ok(moved)
    }
}
