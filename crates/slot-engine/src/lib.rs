//! # slot-engine
//!
//! Deterministic appointment-slot availability and booking validation for a
//! barbershop.
//!
//! Given weekly operating hours, date-specific exceptions, and the slots
//! already booked, the engine decides which start times can be offered and
//! whether a requested booking fits. Every function is pure over the data it
//! is handed; the one exception is [`ledger::BookingLedger`], which makes
//! check-then-book atomic for callers that keep appointments in memory.
//!
//! ## Modules
//!
//! - [`time`] — `"HH:MM"` / `"YYYY-MM-DD"` parsing and formatting
//! - [`grid`] — slot-grid generation and morning/afternoon/evening grouping
//! - [`schedule`] — templates, exceptions, barbers, barber selection
//! - [`resolver`] — effective working window for a barber on a date
//! - [`availability`] — free slots for one barber or the any-barber union
//! - [`booking`] — run building and booking validation
//! - [`appointments`] — booked-slot sets from appointment records
//! - [`ledger`] — in-memory store with atomic reservation
//! - [`snapshot`] — JSON input document
//! - [`config`] — engine tunables
//! - [`error`] — Error types

pub mod appointments;
pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod grid;
pub mod ledger;
pub mod resolver;
pub mod schedule;
pub mod snapshot;
pub mod time;

pub use availability::{
    free_slots, open_dates, slots_for_selection, union_free_slots, BookedByBarber, BookedSlots,
    DayAvailability, DayStatus,
};
pub use booking::{
    assign_any_barber, slots_needed, validate_and_build_run, validate_booking, BarberAssignment,
    ServiceRequest, SlotRun,
};
pub use config::EngineConfig;
pub use error::{BookingError, ScheduleError};
pub use grid::{generate_slots, group_slots, DayPeriods};
pub use ledger::BookingLedger;
pub use resolver::{resolve_day, resolve_day_config, ConfigSource, Resolution};
pub use schedule::{
    Barber, BarberSelection, DayConfig, DayWindow, Exception, ExceptionStatus, ShopSchedule,
    WeeklyTemplate,
};
pub use snapshot::ScheduleSnapshot;
pub use time::{parse_date, to_minutes, TimeOfDay};
