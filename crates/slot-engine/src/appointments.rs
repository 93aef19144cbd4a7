//! Derive booked-slot sets from appointment records.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::availability::{BookedByBarber, BookedSlots};
use crate::booking::slots_needed;
use crate::time::TimeOfDay;

/// An appointment as stored by the caller.
///
/// Either `slots` lists the reserved run explicitly, or `start` plus
/// `duration_minutes` describe it. When neither duration nor slots are
/// present the appointment occupies a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub barber_id: String,
    #[serde(with = "crate::time::canonical_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<TimeOfDay>,
}

impl AppointmentRecord {
    /// The slots this appointment occupies on its day.
    pub fn occupied(&self, granularity: u32) -> Vec<TimeOfDay> {
        if !self.slots.is_empty() {
            return self.slots.clone();
        }
        match self.start {
            Some(start) => occupied_slots(
                start,
                self.duration_minutes.unwrap_or(granularity),
                granularity,
            ),
            None => Vec::new(),
        }
    }
}

/// The contiguous slots covered by a service of `duration_minutes` starting
/// at `start`. Slots that would begin at or after `24:00` are dropped.
pub fn occupied_slots(
    start: TimeOfDay,
    duration_minutes: u32,
    granularity: u32,
) -> Vec<TimeOfDay> {
    let count = slots_needed(duration_minutes, granularity).max(1);
    (0..count)
        .map_while(|k| {
            let offset = u32::try_from(k).ok()?.checked_mul(granularity)?;
            start.checked_add(offset)
        })
        .filter(|slot| *slot < TimeOfDay::END_OF_DAY)
        .collect()
}

/// Booked slots for one barber on one date.
pub fn booked_slots_for(
    records: &[AppointmentRecord],
    barber_id: &str,
    date: NaiveDate,
    granularity: u32,
) -> BookedSlots {
    records
        .iter()
        .filter(|r| r.barber_id == barber_id && r.date == date)
        .flat_map(|r| r.occupied(granularity))
        .collect()
}

/// Booked slots on `date` for every barber that has appointments.
pub fn booked_by_barber(
    records: &[AppointmentRecord],
    date: NaiveDate,
    granularity: u32,
) -> BookedByBarber {
    let mut booked = BookedByBarber::new();
    for record in records.iter().filter(|r| r.date == date) {
        booked
            .entry(record.barber_id.clone())
            .or_default()
            .extend(record.occupied(granularity));
    }
    booked
}

/// Booked slots grouped by date, then by barber.
pub fn booked_by_date(
    records: &[AppointmentRecord],
    granularity: u32,
) -> HashMap<NaiveDate, BookedByBarber> {
    let mut booked: HashMap<NaiveDate, BookedByBarber> = HashMap::new();
    for record in records {
        booked
            .entry(record.date)
            .or_default()
            .entry(record.barber_id.clone())
            .or_default()
            .extend(record.occupied(granularity));
    }
    booked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn sixty_minutes_occupies_two_half_hour_slots() {
        assert_eq!(occupied_slots(t("09:00"), 60, 30), vec![t("09:00"), t("09:30")]);
    }

    #[test]
    fn partial_slot_rounds_up() {
        assert_eq!(
            occupied_slots(t("09:00"), 45, 30),
            vec![t("09:00"), t("09:30")]
        );
    }

    #[test]
    fn run_is_cut_at_midnight() {
        assert_eq!(occupied_slots(t("23:30"), 90, 30), vec![t("23:30")]);
    }

    #[test]
    fn explicit_slots_win_over_duration() {
        let record = AppointmentRecord {
            barber_id: "ana".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            start: Some(t("09:00")),
            duration_minutes: Some(90),
            slots: vec![t("10:00")],
        };
        assert_eq!(record.occupied(30), vec![t("10:00")]);
    }
}
