//! WASM bindings for slot-engine.
//!
//! Exposes day resolution, slot availability, grouping and booking
//! validation to JavaScript via `wasm-bindgen`. Schedules travel as a JSON
//! snapshot string (the same document the `slots` CLI reads) and results come
//! back as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```
//!
//! Barber selections are passed as JSON as well:
//! `{"kind":"any_barber"}` or `{"kind":"specific_barber","barberId":"ana"}`.
//!
//! Booking outcomes (no barber selected, unknown barber, slot taken) are
//! returned as `{"status":"rejected","code","reason"}` data. Only malformed
//! input throws.

use chrono::NaiveDate;
use serde::Serialize;
use slot_engine::resolver::{self, DaySources};
use slot_engine::{
    BarberSelection, BookingError, EngineConfig, ScheduleSnapshot, ServiceRequest, TimeOfDay,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Result of a booking validation. Rejections are data, not thrown errors.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum BookingOutcome {
    Accepted {
        #[serde(rename = "barberId")]
        barber_id: String,
        date: NaiveDate,
        run: Vec<TimeOfDay>,
    },
    Rejected {
        code: &'static str,
        reason: String,
    },
}

impl From<BookingError> for BookingOutcome {
    fn from(e: BookingError) -> Self {
        BookingOutcome::Rejected {
            code: e.code(),
            reason: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers: parse boundary inputs
// ---------------------------------------------------------------------------

fn parse_snapshot(json: &str) -> Result<ScheduleSnapshot, String> {
    ScheduleSnapshot::from_json(json).map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    slot_engine::parse_date(s).map_err(|e| e.to_string())
}

fn parse_time(s: &str) -> Result<TimeOfDay, String> {
    s.parse().map_err(|e: slot_engine::ScheduleError| e.to_string())
}

fn parse_selection(json: &str) -> Result<BarberSelection, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid barber selection JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// JSON-in, JSON-out implementations
// ---------------------------------------------------------------------------

fn resolve_day_json(
    snapshot_json: &str,
    date: &str,
    barber_id: Option<&str>,
) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let date = parse_date(date)?;

    let sources = match barber_id {
        Some(id) => {
            let barber = snapshot
                .barbers
                .iter()
                .find(|b| b.id == id)
                .ok_or_else(|| format!("Unknown barber: {}", id))?;
            DaySources::for_barber(barber, &snapshot.shop)
        }
        None => DaySources::shop_only(&snapshot.shop),
    };

    to_json(&resolver::resolve_day(date, &sources))
}

fn available_slots_json(
    snapshot_json: &str,
    date: &str,
    selection_json: &str,
) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let date = parse_date(date)?;
    let selection = parse_selection(selection_json)?;

    match slot_engine::slots_for_selection(
        date,
        &selection,
        &snapshot.barbers,
        &snapshot.shop,
        &snapshot.booked_by_barber(date),
        &snapshot.config,
    ) {
        Ok(day) => to_json(&day),
        Err(e) => to_json(&BookingOutcome::from(e)),
    }
}

fn group_slots_json(slots_json: &str) -> Result<String, String> {
    let slots: Vec<TimeOfDay> =
        serde_json::from_str(slots_json).map_err(|e| format!("Invalid slots JSON: {}", e))?;
    to_json(&slot_engine::group_slots(&slots))
}

fn validate_booking_json(
    snapshot_json: &str,
    date: &str,
    selection_json: &str,
    start: &str,
    duration_minutes: u32,
) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let date = parse_date(date)?;
    let selection = parse_selection(selection_json)?;
    let start = parse_time(start)?;
    let service = ServiceRequest::new(duration_minutes).map_err(|e| e.to_string())?;

    let outcome = match slot_engine::validate_booking(
        date,
        &selection,
        start,
        service,
        &snapshot.barbers,
        &snapshot.shop,
        &snapshot.booked_by_barber(date),
        &snapshot.config,
    ) {
        Ok(assignment) => BookingOutcome::Accepted {
            barber_id: assignment.barber_id,
            date: assignment.date,
            run: assignment.run.into_vec(),
        },
        Err(e) => BookingOutcome::from(e),
    };

    to_json(&outcome)
}

fn open_dates_json(
    snapshot_json: &str,
    from: &str,
    days: u32,
    selection_json: &str,
) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let from = parse_date(from)?;
    let selection = parse_selection(selection_json)?;

    match slot_engine::open_dates(
        from,
        days,
        &selection,
        &snapshot.barbers,
        &snapshot.shop,
        &snapshot.booked_by_date(),
        &snapshot.config,
    ) {
        Ok(dates) => to_json(&dates),
        Err(e) => to_json(&BookingOutcome::from(e)),
    }
}

fn generate_slots_json(
    open: &str,
    close: &str,
    break_start: Option<&str>,
    break_end: Option<&str>,
    interval_minutes: u32,
) -> Result<String, String> {
    let open = parse_time(open)?;
    let close = parse_time(close)?;
    let break_start = break_start.map(parse_time).transpose()?;
    let break_end = break_end.map(parse_time).transpose()?;
    EngineConfig::default()
        .with_granularity(interval_minutes)
        .validate()
        .map_err(|e| e.to_string())?;

    to_json(&slot_engine::generate_slots(
        open,
        break_start,
        break_end,
        close,
        interval_minutes,
    ))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve the effective working window for a date.
///
/// Returns `{"window": {...} | null, "source": "..."}`. With no `barber_id`
/// only the shop schedule is consulted.
#[wasm_bindgen(js_name = "resolveDay")]
pub fn resolve_day(
    snapshot_json: &str,
    date: &str,
    barber_id: Option<String>,
) -> Result<String, JsValue> {
    resolve_day_json(snapshot_json, date, barber_id.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Free slots on a date for a barber selection, with period grouping.
///
/// An unselected or unknown barber comes back as
/// `{"status":"rejected","code","reason"}` rather than throwing.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(
    snapshot_json: &str,
    date: &str,
    selection_json: &str,
) -> Result<String, JsValue> {
    available_slots_json(snapshot_json, date, selection_json).map_err(|e| JsValue::from_str(&e))
}

/// Group a JSON array of `"HH:MM"` strings into morning, afternoon and evening.
#[wasm_bindgen(js_name = "groupSlots")]
pub fn group_slots(slots_json: &str) -> Result<String, JsValue> {
    group_slots_json(slots_json).map_err(|e| JsValue::from_str(&e))
}

/// Validate a booking request.
///
/// Returns `{"status":"accepted","barberId","date","run"}` or
/// `{"status":"rejected","code","reason"}`. Only malformed input throws.
#[wasm_bindgen(js_name = "validateBooking")]
pub fn validate_booking(
    snapshot_json: &str,
    date: &str,
    selection_json: &str,
    start: &str,
    duration_minutes: u32,
) -> Result<String, JsValue> {
    validate_booking_json(snapshot_json, date, selection_json, start, duration_minutes)
        .map_err(|e| JsValue::from_str(&e))
}

/// Dates in `[from, from + days)` that still have a free slot.
///
/// Selection problems are returned as a rejection object, as in
/// `availableSlots`.
#[wasm_bindgen(js_name = "openDates")]
pub fn open_dates(
    snapshot_json: &str,
    from: &str,
    days: u32,
    selection_json: &str,
) -> Result<String, JsValue> {
    open_dates_json(snapshot_json, from, days, selection_json).map_err(|e| JsValue::from_str(&e))
}

/// Raw slot grid for a working window, before bookings are applied.
///
/// Throws when `interval_minutes` is outside 1..=720.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(
    open: &str,
    close: &str,
    break_start: Option<String>,
    break_end: Option<String>,
    interval_minutes: u32,
) -> Result<String, JsValue> {
    generate_slots_json(
        open,
        close,
        break_start.as_deref(),
        break_end.as_deref(),
        interval_minutes,
    )
    .map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SNAPSHOT: &str = r#"{
      "shop": { "template": {
        "monday": { "active": true, "open": "09:00", "close": "12:00" },
        "tuesday": { "active": false }
      } },
      "barbers": [ { "id": "ana", "name": "Ana" }, { "id": "bia", "name": "Bia" } ],
      "appointments": [ { "barberId": "ana", "date": "2026-03-16", "slots": ["09:00"] } ]
    }"#;

    const ANY: &str = r#"{"kind":"any_barber"}"#;
    const ANA: &str = r#"{"kind":"specific_barber","barberId":"ana"}"#;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn resolves_shop_day() {
        let value = parse(&resolve_day_json(SNAPSHOT, "2026-03-16", Some("ana")).unwrap());
        assert_eq!(value["source"], "shop_template");
        assert_eq!(value["window"]["close"], "12:00");
    }

    #[test]
    fn unknown_barber_is_an_error() {
        let err = resolve_day_json(SNAPSHOT, "2026-03-16", Some("zed")).unwrap_err();
        assert!(err.contains("zed"));
    }

    #[test]
    fn specific_barber_excludes_booked_slot() {
        let value = parse(&available_slots_json(SNAPSHOT, "2026-03-16", ANA).unwrap());
        assert_eq!(value["slots"][0], "09:30");
        assert_eq!(value["status"], "open");
    }

    #[test]
    fn union_keeps_slot_free_for_other_barber() {
        let value = parse(&available_slots_json(SNAPSHOT, "2026-03-16", ANY).unwrap());
        assert_eq!(value["slots"][0], "09:00");
        assert_eq!(value["slots"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn unselected_barber_is_rejection_data() {
        let value = parse(
            &available_slots_json(SNAPSHOT, "2026-03-16", r#"{"kind":"unselected"}"#).unwrap(),
        );
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["code"], "barber_not_selected");
    }

    #[test]
    fn unknown_barber_dates_are_rejection_data() {
        let zed = r#"{"kind":"specific_barber","barberId":"zed"}"#;
        let value = parse(&open_dates_json(SNAPSHOT, "2026-03-16", 2, zed).unwrap());
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["code"], "unknown_barber");
    }

    #[test]
    fn bad_selection_json_is_an_error() {
        assert!(available_slots_json(SNAPSHOT, "2026-03-16", "any").is_err());
    }

    #[test]
    fn groups_slots() {
        let value = parse(&group_slots_json(r#"["09:00","12:00","17:00"]"#).unwrap());
        assert_eq!(value["morning"][0], "09:00");
        assert_eq!(value["afternoon"][0], "12:00");
        assert_eq!(value["evening"][0], "17:00");
    }

    #[test]
    fn any_barber_booking_assigns_free_barber() {
        let value =
            parse(&validate_booking_json(SNAPSHOT, "2026-03-16", ANY, "09:00", 60).unwrap());
        assert_eq!(value["status"], "accepted");
        assert_eq!(value["barberId"], "bia");
        assert_eq!(value["run"], serde_json::json!(["09:00", "09:30"]));
    }

    #[test]
    fn rejection_is_data_not_error() {
        let value =
            parse(&validate_booking_json(SNAPSHOT, "2026-03-16", ANA, "11:30", 60).unwrap());
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["code"], "insufficient_trailing_slots");
    }

    #[test]
    fn zero_duration_is_an_error() {
        assert!(validate_booking_json(SNAPSHOT, "2026-03-16", ANA, "09:00", 0).is_err());
    }

    #[test]
    fn open_dates_skip_closed_days() {
        let value = parse(&open_dates_json(SNAPSHOT, "2026-03-16", 2, ANY).unwrap());
        assert_eq!(value, serde_json::json!(["2026-03-16"]));
    }

    #[test]
    fn generates_grid_around_break() {
        let value = parse(
            &generate_slots_json("09:00", "11:00", Some("09:30"), Some("10:00"), 30).unwrap(),
        );
        assert_eq!(value, serde_json::json!(["09:00", "10:00", "10:30"]));
    }

    #[test]
    fn out_of_range_interval_is_an_error() {
        assert!(generate_slots_json("09:00", "12:00", None, None, u32::MAX).is_err());
        assert!(generate_slots_json("09:00", "12:00", None, None, 0).is_err());
        assert!(generate_slots_json("09:00", "12:00", None, None, 720).is_ok());
    }

    #[test]
    fn malformed_time_is_an_error() {
        assert!(generate_slots_json("9", "11:00", None, None, 30).is_err());
    }
}
