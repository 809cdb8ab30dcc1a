use log::info;
use serde::Serialize;

use crate::data::{Catalog, Conflict, ConflictType, Constraints, Severity, TimetableSlot, Year};
use crate::error::ServiceError;
use crate::preflight;
use crate::solver;
use crate::stats::GenerationStats;
use crate::store::{SlotFilter, SlotStore};

/// Outcome of a scoped regeneration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub slots: Vec<TimetableSlot>,
    pub conflicts: Vec<Conflict>,
    pub stats: GenerationStats,
}

/// Owns the catalog and the slot store, and runs clear + generate + save as
/// one step per (year, semester).
pub struct TimetableService<S> {
    catalog: Catalog,
    store: S,
}

impl<S: SlotStore> TimetableService<S> {
    pub fn new(catalog: Catalog, store: S) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn check(&self, year: Year, semester: u32) -> Vec<Conflict> {
        preflight::check_configuration(&self.catalog, year, semester)
    }

    /// Replaces the stored timetable of `year`/`semester` with a fresh one.
    ///
    /// Refuses to start when the configuration has errors. The scope is
    /// cleared before generation, so an empty result leaves it empty. Slots
    /// stored for other scopes stay booked while the new ones are placed.
    pub fn regenerate(
        &mut self,
        year: Year,
        semester: u32,
        constraints: &Constraints,
    ) -> Result<GenerationReport, ServiceError> {
        let checks = self.check(year, semester);
        if checks.iter().any(Conflict::is_error) {
            return Err(ServiceError::InvalidConfiguration(checks));
        }

        let subjects: Vec<_> = self
            .catalog
            .subjects
            .iter()
            .filter(|s| s.year == year && s.semester == semester)
            .cloned()
            .collect();
        let classrooms: Vec<_> = self
            .catalog
            .classrooms
            .iter()
            .filter(|c| c.assigned_year == year)
            .cloned()
            .collect();
        let faculty: Vec<_> = self
            .catalog
            .faculty
            .iter()
            .filter(|f| subjects.iter().any(|s| s.faculty == f.name))
            .cloned()
            .collect();
        let labs = &self.catalog.labs;

        let cleared = self.store.clear_scope(year, semester);
        info!("Cleared {} stored slots for {} Semester {}", cleared, year, semester);

        // other scopes keep their faculty and lab rooms
        let reserved = self.store.find(&SlotFilter::default());
        let output = solver::generate_around(
            &reserved,
            &subjects,
            &faculty,
            &classrooms,
            labs,
            constraints,
        );
        if output.slots.is_empty() {
            return Err(ServiceError::EmptyTimetable(output.conflicts));
        }

        let saved = self.store.batch_save(&output.slots)?;
        info!("Saved {} slots for {} Semester {}", saved, year, semester);

        // only the requested year has a classroom after filtering
        let stats = GenerationStats::calculate(&output, 1, labs.len());
        let mut conflicts = vec![
            Conflict::new(
                ConflictType::Success,
                Severity::Low,
                format!(
                    "Successfully generated and saved timetable for {} Semester {}",
                    year, semester
                ),
                [year.to_string()],
            ),
            Conflict::new(
                ConflictType::Info,
                Severity::Low,
                format!("Generated {} time slots and saved", output.slots.len()),
                [year.to_string()],
            ),
        ];
        conflicts.extend(output.conflicts);

        Ok(GenerationReport {
            slots: output.slots,
            conflicts,
            stats,
        })
    }

    pub fn slots(&self, filter: &SlotFilter) -> Vec<TimetableSlot> {
        self.store.find(filter)
    }

    pub fn clear_all(&mut self) -> usize {
        self.store.clear_all()
    }
}
