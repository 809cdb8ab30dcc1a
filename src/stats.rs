use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::{Conflict, ConflictType, GenerationOutput, SessionType};
use crate::grid::{DAYS, LAB_SLOTS};

/// Every classroom shift offers this many theory slots a day.
const THEORY_SLOTS_PER_DAY: usize = 6;

/// Summary figures for a generated timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub total_slots: usize,
    pub theory_slots: usize,
    pub lab_slots: usize,
    /// Theory slots over the theory capacity of the scheduled years.
    pub utilization_rate: f64,
    /// Lab sessions over lab blocks across all labs.
    pub lab_utilization: f64,
    /// Mean weekly hours of faculty with at least one session.
    pub faculty_workload: f64,
    pub conflicts_by_type: BTreeMap<ConflictType, usize>,
}

impl GenerationStats {
    /// `years_with_classroom` and `labs` describe the capacity the run had.
    pub fn calculate(output: &GenerationOutput, years_with_classroom: usize, labs: usize) -> Self {
        let theory_slots = output
            .slots
            .iter()
            .filter(|s| s.kind == SessionType::Theory)
            .count();
        let lab_slots = output.slots.len() - theory_slots;

        let theory_capacity = years_with_classroom * DAYS.len() * THEORY_SLOTS_PER_DAY;
        let lab_capacity = labs * DAYS.len() * LAB_SLOTS.len();

        let mut weekly: BTreeMap<&str, u32> = BTreeMap::new();
        for slot in &output.slots {
            *weekly.entry(slot.faculty.as_str()).or_insert(0) += slot.duration;
        }
        let faculty_workload = if weekly.is_empty() {
            0.0
        } else {
            weekly.values().sum::<u32>() as f64 / weekly.len() as f64
        };

        Self {
            total_slots: output.slots.len(),
            theory_slots,
            lab_slots,
            utilization_rate: ratio(theory_slots, theory_capacity),
            lab_utilization: ratio(lab_slots, lab_capacity),
            faculty_workload,
            conflicts_by_type: count_by_type(&output.conflicts),
        }
    }
}

fn ratio(used: usize, capacity: usize) -> f64 {
    if capacity == 0 {
        0.0
    } else {
        used as f64 / capacity as f64
    }
}

fn count_by_type(conflicts: &[Conflict]) -> BTreeMap<ConflictType, usize> {
    let mut counts = BTreeMap::new();
    for conflict in conflicts {
        *counts.entry(conflict.kind).or_insert(0) += 1;
    }
    counts
}
