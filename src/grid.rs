//! The fixed weekly grid: weekdays, canonical slot strings and adjacency.
//!
//! Slots are identified by their range strings (`"10:15-11:15"`). Ordering
//! is never derived from those strings directly since `"10:15"` sorts before
//! `"9:00"`; callers go through [`slot_ordinal`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::ClassroomShift;
use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub const DAYS: [Day; 5] = [
    Day::Monday,
    Day::Tuesday,
    Day::Wednesday,
    Day::Thursday,
    Day::Friday,
];

/// One-hour lecture slots in chronological order. The 10:00-10:15 break and
/// the lunch hour sit between entries and are never materialized.
pub const THEORY_SLOTS: [&str; 8] = [
    "8:00-9:00",
    "9:00-10:00",
    "10:15-11:15",
    "11:15-12:15",
    "1:15-2:15",
    "2:15-3:15",
    "3:15-4:15",
    "4:15-5:15",
];

/// Two-hour afternoon lab blocks.
pub const LAB_SLOTS: [&str; 2] = ["1:15-3:15", "3:15-5:15"];

// the short break is the only gap that still counts as back-to-back
const SHORT_BREAK_START: &str = "10:00";
const SHORT_BREAK_END: &str = "10:15";

/// The theory slots a classroom offers each day.
pub fn available_theory_slots(shift: ClassroomShift) -> &'static [&'static str] {
    match shift {
        // full morning plus the first two afternoon hours
        ClassroomShift::Early => &THEORY_SLOTS[..6],
        // last two morning hours plus the full afternoon
        ClassroomShift::Late => &THEORY_SLOTS[2..],
    }
}

/// Splits `"start-end"` into its two halves.
pub fn split_range(time: &str) -> Result<(&str, &str), GenerationError> {
    match time.split_once('-') {
        Some((start, end)) if !start.is_empty() && !end.is_empty() => Ok((start, end)),
        _ => Err(GenerationError::MalformedTimeRange(time.to_string())),
    }
}

/// Chronological position of a range, keyed on its start time.
///
/// Lab blocks share start times with theory slots (`1:15`, `3:15`), so both
/// kinds order on the same scale.
pub fn slot_ordinal(time: &str) -> Result<usize, GenerationError> {
    let (start, _) = split_range(time)?;
    THEORY_SLOTS
        .iter()
        .position(|slot| slot.split_once('-').is_some_and(|(s, _)| s == start))
        .ok_or_else(|| GenerationError::UnknownTimeSlot(time.to_string()))
}

/// Whether `later` starts exactly when `earlier` ends, allowing the short
/// morning break.
pub fn are_consecutive(earlier: &str, later: &str) -> Result<bool, GenerationError> {
    let (_, end) = split_range(earlier)?;
    let (start, _) = split_range(later)?;
    Ok(end == start || (end == SHORT_BREAK_START && start == SHORT_BREAK_END))
}
