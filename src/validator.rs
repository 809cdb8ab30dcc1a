//! Post-placement checks over a finished slot set.
//!
//! The passes only report; they never move or remove slots. Groups are
//! visited in (faculty, day) order so repeated runs over the same slots
//! yield the same conflicts in the same order.

use itertools::Itertools;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::data::{Conflict, ConflictType, Constraints, Faculty, Severity, TimetableSlot};
use crate::error::GenerationError;
use crate::grid::{self, Day, THEORY_SLOTS};

/// Runs the workload, consecutive-hours and break-coverage passes.
pub fn validate(
    slots: &[TimetableSlot],
    faculty: &[Faculty],
    constraints: &Constraints,
) -> Result<Vec<Conflict>, GenerationError> {
    let mut conflicts = check_workload(slots, faculty);
    conflicts.extend(check_consecutive_hours(slots, constraints.max_consecutive_hours)?);
    conflicts.extend(check_break_coverage(slots));
    Ok(conflicts)
}

/// Total hours per (faculty, day).
pub fn daily_hours(slots: &[TimetableSlot]) -> BTreeMap<(&str, Day), u32> {
    let mut hours = BTreeMap::new();
    for slot in slots {
        *hours.entry((slot.faculty.as_str(), slot.day)).or_insert(0) += slot.duration;
    }
    hours
}

/// Flags days on which a teacher exceeds their own `max_hours_per_day`.
/// Teachers absent from `faculty` are not checked.
pub fn check_workload(slots: &[TimetableSlot], faculty: &[Faculty]) -> Vec<Conflict> {
    let by_name: HashMap<&str, &Faculty> = faculty.iter().map(|f| (f.name.as_str(), f)).collect();

    daily_hours(slots)
        .into_iter()
        .filter_map(|((name, day), hours)| {
            let member = by_name.get(name)?;
            (hours > member.max_hours_per_day).then(|| {
                Conflict::new(
                    ConflictType::Warning,
                    Severity::Medium,
                    format!(
                        "{} has {} hours on {} (exceeds preference of {} hours)",
                        name, hours, day, member.max_hours_per_day
                    ),
                    [name],
                )
            })
        })
        .collect()
}

/// Flags (faculty, day) pairs whose longest back-to-back run exceeds `limit`.
pub fn check_consecutive_hours(
    slots: &[TimetableSlot],
    limit: u32,
) -> Result<Vec<Conflict>, GenerationError> {
    let mut conflicts = Vec::new();

    for ((name, day), day_slots) in group_by_faculty_day(slots) {
        let longest = longest_run(&day_slots)?;
        if longest > limit {
            conflicts.push(Conflict::new(
                ConflictType::Warning,
                Severity::Medium,
                format!("{} has {} consecutive hours on {}", name, longest, day),
                [name],
            ));
        }
    }

    Ok(conflicts)
}

/// Longest run of back-to-back hours, in chronological slot order.
fn longest_run(slots: &[&TimetableSlot]) -> Result<u32, GenerationError> {
    let mut ordered = slots
        .iter()
        .map(|slot| Ok((grid::slot_ordinal(&slot.time)?, *slot)))
        .collect::<Result<Vec<_>, GenerationError>>()?;
    ordered.sort_by_key(|(ordinal, _)| *ordinal);

    let mut current = 0;
    let mut longest = 0;
    for (i, (_, slot)) in ordered.iter().enumerate() {
        if i == 0 || grid::are_consecutive(&ordered[i - 1].1.time, &slot.time)? {
            current += slot.duration;
        } else {
            longest = longest.max(current);
            current = slot.duration;
        }
    }
    Ok(longest.max(current))
}

/// Flags teachers left without a single free theory slot on a day they work.
pub fn check_break_coverage(slots: &[TimetableSlot]) -> Vec<Conflict> {
    group_by_faculty_day(slots)
        .into_iter()
        .filter_map(|((name, day), day_slots)| {
            let used: HashSet<&str> = day_slots.iter().map(|s| s.time.as_str()).collect();
            let free = THEORY_SLOTS.iter().filter(|t| !used.contains(*t)).count();
            (free == 0).then(|| {
                Conflict::new(
                    ConflictType::Error,
                    Severity::High,
                    format!("{} has no free slots on {}", name, day),
                    [name],
                )
            })
        })
        .collect()
}

fn group_by_faculty_day(slots: &[TimetableSlot]) -> Vec<((&str, Day), Vec<&TimetableSlot>)> {
    slots
        .iter()
        .map(|slot| ((slot.faculty.as_str(), slot.day), slot))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect()
}
