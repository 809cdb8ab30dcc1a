//! Configuration check run before a scoped generation.
//!
//! Looks only at the catalog, never at placed slots. A clean configuration
//! is acknowledged with a single `success` conflict.

use itertools::Itertools;
use std::collections::HashSet;

use crate::data::{Catalog, Conflict, ConflictType, Severity, Year};
use crate::grid::DAYS;

/// Checks whether `catalog` can produce a timetable for `year`/`semester`.
pub fn check_configuration(catalog: &Catalog, year: Year, semester: u32) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let subjects: Vec<_> = catalog
        .subjects
        .iter()
        .filter(|s| s.year == year && s.semester == semester)
        .collect();
    let has_classroom = catalog.classrooms.iter().any(|c| c.assigned_year == year);

    if subjects.is_empty() {
        conflicts.push(Conflict::new(
            ConflictType::Error,
            Severity::High,
            format!("No subjects found for {} Semester {}", year, semester),
            [year.to_string()],
        ));
    }

    if !has_classroom {
        conflicts.push(Conflict::new(
            ConflictType::Error,
            Severity::High,
            format!("No classrooms assigned to {}", year),
            [year.to_string()],
        ));
    }

    let known: HashSet<&str> = catalog.faculty.iter().map(|f| f.name.as_str()).collect();
    let missing: Vec<&str> = subjects
        .iter()
        .map(|s| s.faculty.as_str())
        .filter(|name| !known.contains(name))
        .unique()
        .collect();
    if !missing.is_empty() {
        conflicts.push(Conflict::new(
            ConflictType::Warning,
            Severity::Medium,
            format!("Faculty not found: {}", missing.join(", ")),
            missing.iter().copied(),
        ));
    }

    let lab_subjects = subjects.iter().filter(|s| s.lab_hours > 0).count();
    if lab_subjects > 0 && catalog.labs.is_empty() {
        conflicts.push(Conflict::new(
            ConflictType::Warning,
            Severity::Medium,
            format!(
                "{} subjects require labs, but no labs are configured",
                lab_subjects
            ),
            ["labs"],
        ));
    }

    let teaching = catalog.faculty.iter().filter(|f| {
        subjects
            .iter()
            .any(|s| s.faculty == f.name || f.subjects.contains(&s.code))
    });
    for member in teaching {
        // u64: request figures may sit near u32::MAX
        let weekly: u64 = subjects
            .iter()
            .filter(|s| s.faculty == member.name)
            .map(|s| u64::from(s.theory_hours) + u64::from(s.lab_hours))
            .sum();
        let ceiling = u64::from(member.max_hours_per_day) * DAYS.len() as u64;
        if weekly > ceiling {
            conflicts.push(Conflict::new(
                ConflictType::Warning,
                Severity::Medium,
                format!(
                    "{} assigned {}h/week (exceeds {}h preference)",
                    member.name, weekly, ceiling
                ),
                [member.name.clone()],
            ));
        }
    }

    if !subjects.is_empty() && has_classroom && missing.is_empty() && conflicts.is_empty() {
        conflicts.push(Conflict::new(
            ConflictType::Success,
            Severity::Low,
            "Configuration is valid and ready for generation",
            Vec::<String>::new(),
        ));
    }

    conflicts
}
