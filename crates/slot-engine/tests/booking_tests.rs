//! Tests for run building and booking validation.

use chrono::{NaiveDate, Weekday};
use slot_engine::booking::validate_for_barber;
use slot_engine::{
    assign_any_barber, slots_needed, validate_and_build_run, validate_booking, Barber,
    BarberSelection, BookedByBarber, BookedSlots, BookingError, DayConfig, EngineConfig,
    ServiceRequest, ShopSchedule, TimeOfDay, WeeklyTemplate,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn times(list: &[&str]) -> Vec<TimeOfDay> {
    list.iter().map(|s| t(s)).collect()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn shop(config: DayConfig) -> ShopSchedule {
    ShopSchedule {
        template: WeeklyTemplate::every_day(config),
        exceptions: Vec::new(),
    }
}

fn service(minutes: u32) -> ServiceRequest {
    ServiceRequest::new(minutes).unwrap()
}

// ── slots_needed ────────────────────────────────────────────────────────────

#[test]
fn slots_needed_rounds_up() {
    assert_eq!(slots_needed(30, 30), 1);
    assert_eq!(slots_needed(31, 30), 2);
    assert_eq!(slots_needed(60, 30), 2);
    assert_eq!(slots_needed(90, 30), 3);
    assert_eq!(slots_needed(45, 15), 3);
}

#[test]
fn zero_duration_service_is_rejected() {
    assert!(ServiceRequest::new(0).is_err());
}

// ── validate_and_build_run ──────────────────────────────────────────────────

#[test]
fn builds_contiguous_run() {
    let available = times(&["09:00", "09:30", "10:00", "10:30"]);
    let run = validate_and_build_run(t("09:30"), 2, &available, 30).unwrap();
    assert_eq!(run.slots(), times(&["09:30", "10:00"]).as_slice());
}

#[test]
fn missing_start_is_not_available() {
    let available = times(&["09:00", "09:30"]);
    assert_eq!(
        validate_and_build_run(t("10:00"), 1, &available, 30),
        Err(BookingError::SlotNotAvailable)
    );
}

#[test]
fn gap_in_run_is_non_contiguous() {
    let available = times(&["09:00", "09:30", "10:30"]);
    assert_eq!(
        validate_and_build_run(t("09:30"), 2, &available, 30),
        Err(BookingError::NonContiguousRun)
    );
}

#[test]
fn run_past_end_of_list_is_insufficient() {
    let available = times(&["09:00", "09:30"]);
    assert_eq!(
        validate_and_build_run(t("09:30"), 2, &available, 30),
        Err(BookingError::InsufficientTrailingSlots)
    );
}

#[test]
fn oversized_run_is_insufficient() {
    let available = times(&["09:00", "09:30"]);
    assert_eq!(
        validate_and_build_run(t("09:30"), usize::MAX, &available, 30),
        Err(BookingError::InsufficientTrailingSlots)
    );
}

#[test]
fn run_exactly_reaching_close_is_accepted() {
    let available = times(&["11:00", "11:30"]);
    let run = validate_and_build_run(t("11:00"), 2, &available, 30).unwrap();
    assert_eq!(run.len(), 2);
}

// ── Single barber ───────────────────────────────────────────────────────────

#[test]
fn hour_long_service_at_last_slot_runs_past_close() {
    // 08:00-12:00, 60-minute service starting 11:30.
    let shop = shop(DayConfig::open(t("08:00"), t("12:00")));
    let barber = Barber::new("ana", "Ana");

    let result = validate_for_barber(
        monday(),
        t("11:30"),
        service(60).slots_needed(30),
        &barber,
        &shop,
        &BookedSlots::new(),
        30,
    );

    assert_eq!(result, Err(BookingError::InsufficientTrailingSlots));
}

#[test]
fn run_crossing_break_is_rejected() {
    let shop = shop(DayConfig::open(t("09:00"), t("14:00")).with_break(t("12:00"), t("13:00")));
    let barber = Barber::new("ana", "Ana");

    let booked = BookedSlots::new();
    let result = validate_for_barber(monday(), t("11:30"), 2, &barber, &shop, &booked, 30);

    assert_eq!(result, Err(BookingError::NonContiguousRun));
}

#[test]
fn run_ending_at_break_start_is_accepted() {
    let shop = shop(DayConfig::open(t("09:00"), t("14:00")).with_break(t("12:00"), t("13:00")));
    let barber = Barber::new("ana", "Ana");

    let booked = BookedSlots::new();
    let assignment =
        validate_for_barber(monday(), t("11:00"), 2, &barber, &shop, &booked, 30).unwrap();

    assert_eq!(assignment.run.slots(), times(&["11:00", "11:30"]).as_slice());
}

#[test]
fn run_over_booked_slot_is_rejected() {
    let shop = shop(DayConfig::open(t("09:00"), t("12:00")));
    let barber = Barber::new("ana", "Ana");
    let booked: BookedSlots = [t("10:00")].into_iter().collect();

    let result = validate_for_barber(monday(), t("09:30"), 2, &barber, &shop, &booked, 30);

    assert_eq!(result, Err(BookingError::NonContiguousRun));
}

#[test]
fn booked_start_is_not_available() {
    let shop = shop(DayConfig::open(t("09:00"), t("12:00")));
    let barber = Barber::new("ana", "Ana");
    let booked: BookedSlots = [t("09:30")].into_iter().collect();

    let result = validate_for_barber(monday(), t("09:30"), 1, &barber, &shop, &booked, 30);

    assert_eq!(result, Err(BookingError::SlotNotAvailable));
}

#[test]
fn closed_day_is_unavailable() {
    let shop = shop(DayConfig::closed());
    let barber = Barber::new("ana", "Ana");

    let booked = BookedSlots::new();
    let result = validate_for_barber(monday(), t("09:00"), 1, &barber, &shop, &booked, 30);

    assert_eq!(result, Err(BookingError::DayUnavailable));
}

// ── Any barber ──────────────────────────────────────────────────────────────

#[test]
fn any_barber_skips_closed_barber() {
    let shop = shop(DayConfig::open(t("09:00"), t("12:00")));
    let barbers = vec![
        Barber::new("a", "A")
            .with_template(WeeklyTemplate::default().with(Weekday::Mon, DayConfig::closed())),
        Barber::new("b", "B"),
    ];

    let assignment = assign_any_barber(
        monday(),
        t("09:00"),
        service(30).slots_needed(30),
        &barbers,
        &shop,
        &BookedByBarber::new(),
        30,
    )
    .unwrap();

    assert_eq!(assignment.barber_id, "b");
    assert_eq!(assignment.run.slots(), times(&["09:00"]).as_slice());
}

#[test]
fn any_barber_prefers_first_in_list() {
    let shop = shop(DayConfig::open(t("09:00"), t("12:00")));
    let barbers = vec![Barber::new("a", "A"), Barber::new("b", "B")];

    let assignment =
        assign_any_barber(monday(), t("10:00"), 2, &barbers, &shop, &BookedByBarber::new(), 30)
            .unwrap();

    assert_eq!(assignment.barber_id, "a");
}

#[test]
fn any_barber_checks_own_grid_not_union() {
    // A is free at 09:00 only, B is free at 09:30 only. The union offers both
    // but neither barber can hold a 60-minute run from 09:00.
    let shop = shop(DayConfig::open(t("09:00"), t("10:00")));
    let barbers = vec![Barber::new("a", "A"), Barber::new("b", "B")];
    let mut booked = BookedByBarber::new();
    booked.insert("a".to_string(), [t("09:30")].into_iter().collect());
    booked.insert("b".to_string(), [t("09:00")].into_iter().collect());

    let result = assign_any_barber(monday(), t("09:00"), 2, &barbers, &shop, &booked, 30);

    assert_eq!(result, Err(BookingError::NoBarberAvailable));
}

#[test]
fn any_barber_falls_through_to_one_with_room() {
    let shop = shop(DayConfig::open(t("09:00"), t("11:00")));
    let barbers = vec![Barber::new("a", "A"), Barber::new("b", "B")];
    let mut booked = BookedByBarber::new();
    booked.insert("a".to_string(), [t("10:00")].into_iter().collect());

    let assignment =
        assign_any_barber(monday(), t("09:30"), 2, &barbers, &shop, &booked, 30).unwrap();

    assert_eq!(assignment.barber_id, "b");
    assert_eq!(assignment.run.slots(), times(&["09:30", "10:00"]).as_slice());
}

// ── validate_booking ────────────────────────────────────────────────────────

#[test]
fn unselected_cannot_be_booked() {
    let result = validate_booking(
        monday(),
        &BarberSelection::Unselected,
        t("09:00"),
        service(30),
        &[Barber::new("a", "A")],
        &shop(DayConfig::open(t("09:00"), t("12:00"))),
        &BookedByBarber::new(),
        &EngineConfig::default(),
    );
    assert_eq!(result, Err(BookingError::BarberNotSelected));
}

#[test]
fn specific_barber_booking_uses_service_duration() {
    let assignment = validate_booking(
        monday(),
        &BarberSelection::SpecificBarber("a".to_string()),
        t("09:00"),
        service(75),
        &[Barber::new("a", "A")],
        &shop(DayConfig::open(t("09:00"), t("12:00"))),
        &BookedByBarber::new(),
        &EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(assignment.run.slots(), times(&["09:00", "09:30", "10:00"]).as_slice());
    assert_eq!(assignment.date, monday());
}

#[test]
fn coarser_granularity_changes_run_length() {
    let config = EngineConfig::default().with_granularity(60);
    let assignment = validate_booking(
        monday(),
        &BarberSelection::AnyBarber,
        t("09:00"),
        service(90),
        &[Barber::new("a", "A")],
        &shop(DayConfig::open(t("09:00"), t("12:00"))),
        &BookedByBarber::new(),
        &config,
    )
    .unwrap();
    assert_eq!(assignment.run.slots(), times(&["09:00", "10:00"]).as_slice());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(BookingError::NonContiguousRun.code(), "non_contiguous_run");
    assert_eq!(
        BookingError::InsufficientTrailingSlots.code(),
        "insufficient_trailing_slots"
    );
    assert_eq!(BookingError::NoBarberAvailable.code(), "no_barber_available");
}
