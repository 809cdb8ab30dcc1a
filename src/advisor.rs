//! Workload-balance hints over a finished timetable.
//!
//! Purely advisory: every hint is an `info` conflict and never changes the
//! placed slots.

use itertools::{Itertools, MinMaxResult};
use std::collections::BTreeMap;

use crate::data::{Conflict, ConflictType, Severity, TimetableSlot};
use crate::validator::daily_hours;

/// Spread between a teacher's busiest and lightest day above which a
/// rebalancing hint is emitted.
pub const IMBALANCE_THRESHOLD: u32 = 2;

/// Suggests rebalancing for teachers whose daily load swings too widely.
/// Only days with at least one session count.
pub fn advise(slots: &[TimetableSlot]) -> Vec<Conflict> {
    let mut per_faculty: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for ((name, _), hours) in daily_hours(slots) {
        per_faculty.entry(name).or_default().push(hours);
    }

    per_faculty
        .into_iter()
        .filter_map(|(name, hours)| {
            let (min, max) = match hours.iter().minmax() {
                MinMaxResult::NoElements => return None,
                MinMaxResult::OneElement(h) => (*h, *h),
                MinMaxResult::MinMax(lo, hi) => (*lo, *hi),
            };
            (max - min > IMBALANCE_THRESHOLD).then(|| {
                Conflict::new(
                    ConflictType::Info,
                    Severity::Low,
                    format!(
                        "{}'s workload could be better balanced ({}-{} hours/day)",
                        name, min, max
                    ),
                    [name],
                )
            })
        })
        .collect()
}
