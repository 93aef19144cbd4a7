//! Error types for slot-engine operations.
//!
//! Two families live here. [`ScheduleError`] covers malformed input (bad
//! time strings, inconsistent day configurations) and signals an upstream
//! bug rather than a user mistake. [`BookingError`] covers the expected,
//! recoverable outcomes of a booking attempt; callers map them to a
//! user-facing message and let the client pick another slot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid time of day: {0:?} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid day configuration: {0}")]
    InvalidConfig(String),

    #[error("Service duration must be positive, got {0} minutes")]
    InvalidDuration(u32),

    #[error("Slot granularity must be between 1 and 720 minutes, got {0}")]
    InvalidGranularity(u32),

    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Why a requested booking cannot be honored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("The requested time is not available")]
    SlotNotAvailable,

    #[error("Not enough time before closing for this service")]
    InsufficientTrailingSlots,

    #[error("The service would cross a break or an occupied slot")]
    NonContiguousRun,

    #[error("No barber can take this booking")]
    NoBarberAvailable,

    #[error("This day is not available for bookings")]
    DayUnavailable,

    #[error("No barber was selected")]
    BarberNotSelected,

    #[error("Unknown barber: {0}")]
    UnknownBarber(String),

    #[error("The slots were taken by another booking")]
    SlotConflict,

    #[error("Appointment {0} not found")]
    AppointmentNotFound(u64),
}

impl BookingError {
    /// Stable machine-readable identifier for this outcome.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::SlotNotAvailable => "slot_not_available",
            BookingError::InsufficientTrailingSlots => "insufficient_trailing_slots",
            BookingError::NonContiguousRun => "non_contiguous_run",
            BookingError::NoBarberAvailable => "no_barber_available",
            BookingError::DayUnavailable => "day_unavailable",
            BookingError::BarberNotSelected => "barber_not_selected",
            BookingError::UnknownBarber(_) => "unknown_barber",
            BookingError::SlotConflict => "slot_conflict",
            BookingError::AppointmentNotFound(_) => "appointment_not_found",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
