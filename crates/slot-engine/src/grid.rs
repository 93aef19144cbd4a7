//! Slot-grid generation and display grouping.
//!
//! A day's grid is every start time from `open`, stepped by the slot
//! interval, whose whole slot fits before `close` and does not overlap the
//! break. Slots that merely touch the break (ending exactly at its start or
//! starting exactly at its end) are kept.

use serde::{Deserialize, Serialize};

use crate::time::TimeOfDay;

/// Generate the ascending slot grid for one working window.
///
/// A candidate `t` is kept when `t + interval <= close` and `[t, t + interval)`
/// does not overlap `[break_start, break_end)`. The break is ignored unless
/// both bounds are present. An `interval` of zero, or one too large to fit
/// inside the day, yields an empty grid.
pub fn generate_slots(
    open: TimeOfDay,
    break_start: Option<TimeOfDay>,
    break_end: Option<TimeOfDay>,
    close: TimeOfDay,
    interval: u32,
) -> Vec<TimeOfDay> {
    if interval == 0 {
        return Vec::new();
    }

    let pause = match (break_start, break_end) {
        (Some(start), Some(end)) if start < end => Some((start.minutes(), end.minutes())),
        _ => None,
    };

    let close = close.minutes();
    let mut slots = Vec::new();
    let mut t = open.minutes();

    while let Some(end) = t.checked_add(interval).filter(|end| *end <= close) {
        // Starts inside, ends inside, or swallows the break: all reduce to
        // plain interval overlap.
        let overlaps_break = pause.is_some_and(|(bs, be)| t < be && bs < end);
        if !overlaps_break {
            if let Ok(slot) = TimeOfDay::from_minutes(t) {
                slots.push(slot);
            }
        }
        t = end;
    }

    slots
}

/// Boundaries between the display periods of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodBounds {
    pub afternoon_start: TimeOfDay,
    pub evening_start: TimeOfDay,
}

impl Default for PeriodBounds {
    fn default() -> Self {
        Self {
            afternoon_start: TimeOfDay::NOON,
            evening_start: TimeOfDay::clamped(17 * 60),
        }
    }
}

/// Slots partitioned into morning, afternoon and evening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPeriods {
    pub morning: Vec<TimeOfDay>,
    pub afternoon: Vec<TimeOfDay>,
    pub evening: Vec<TimeOfDay>,
}

impl DayPeriods {
    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.evening.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group slots with the default bounds: morning before `12:00`, afternoon
/// before `17:00`, evening from `17:00`.
pub fn group_slots(slots: &[TimeOfDay]) -> DayPeriods {
    group_slots_with(slots, &PeriodBounds::default())
}

/// Group slots using custom period boundaries. Relative order is preserved
/// and every slot lands in exactly one period.
pub fn group_slots_with(slots: &[TimeOfDay], bounds: &PeriodBounds) -> DayPeriods {
    let mut periods = DayPeriods::default();
    for &slot in slots {
        if slot < bounds.afternoon_start {
            periods.morning.push(slot);
        } else if slot < bounds.evening_start {
            periods.afternoon.push(slot);
        } else {
            periods.evening.push(slot);
        }
    }
    periods
}
