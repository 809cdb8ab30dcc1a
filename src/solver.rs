use log::{debug, error, info};
use std::time::Instant;

use crate::advisor;
use crate::data::{
    Classroom, Conflict, ConflictType, Constraints, Faculty, GenerationInput, GenerationOutput,
    Lab, Severity, Subject, TimetableSlot,
};
use crate::error::GenerationError;
use crate::placement::{self, Ledger};
use crate::validator;

/// Generates a weekly timetable from a request body.
pub fn solve(input: &GenerationInput) -> GenerationOutput {
    generate(
        &input.subjects,
        &input.faculty,
        &input.classrooms,
        &input.labs,
        &input.constraints,
    )
}

/// Runs theory placement, lab placement, validation and advice, in that
/// order.
///
/// Per-item problems come back as conflicts next to the slots that could be
/// placed. If a pass fails outright, nothing is kept and the single returned
/// conflict describes the failure.
pub fn generate(
    subjects: &[Subject],
    faculty: &[Faculty],
    classrooms: &[Classroom],
    labs: &[Lab],
    constraints: &Constraints,
) -> GenerationOutput {
    generate_around(&[], subjects, faculty, classrooms, labs, constraints)
}

/// Like [`generate`], but treats `reserved` slots as already booked: their
/// faculty and lab rooms are unavailable at their times. Reserved slots are
/// neither returned nor validated.
pub fn generate_around(
    reserved: &[TimetableSlot],
    subjects: &[Subject],
    faculty: &[Faculty],
    classrooms: &[Classroom],
    labs: &[Lab],
    constraints: &Constraints,
) -> GenerationOutput {
    let start_time = Instant::now();
    info!(
        "Generating timetable for {} subjects, {} faculty, {} classrooms and {} labs...",
        subjects.len(),
        faculty.len(),
        classrooms.len(),
        labs.len()
    );
    if !reserved.is_empty() {
        debug!("Working around {} reserved slots", reserved.len());
    }

    match run_passes(reserved, subjects, faculty, classrooms, labs, constraints) {
        Ok(output) => {
            info!(
                "Placed {} slots with {} conflicts in {:.2?}",
                output.slots.len(),
                output.conflicts.len(),
                start_time.elapsed()
            );
            output
        }
        Err(e) => failed(e),
    }
}

/// Re-runs validation and advice over an existing slot set, such as a
/// stored or hand-edited timetable. Fails the same way [`generate`] does.
pub fn review(
    slots: Vec<TimetableSlot>,
    faculty: &[Faculty],
    constraints: &Constraints,
) -> GenerationOutput {
    match inspect(&slots, faculty, constraints) {
        Ok(conflicts) => GenerationOutput { slots, conflicts },
        Err(e) => failed(e),
    }
}

fn failed(e: GenerationError) -> GenerationOutput {
    error!("Timetable generation failed: {}", e);
    GenerationOutput {
        slots: Vec::new(),
        conflicts: vec![Conflict::new(
            ConflictType::Error,
            Severity::High,
            format!("Timetable generation failed: {}", e),
            ["system"],
        )],
    }
}

fn run_passes(
    reserved: &[TimetableSlot],
    subjects: &[Subject],
    faculty: &[Faculty],
    classrooms: &[Classroom],
    labs: &[Lab],
    constraints: &Constraints,
) -> Result<GenerationOutput, GenerationError> {
    let mut ledger = Ledger::with_reserved(reserved);
    let mut conflicts = Vec::new();

    placement::place_theory(subjects, classrooms, &mut ledger, &mut conflicts);
    placement::place_labs(subjects, labs, &mut ledger, &mut conflicts);

    let slots = ledger.into_slots();
    conflicts.extend(inspect(&slots, faculty, constraints)?);

    Ok(GenerationOutput { slots, conflicts })
}

fn inspect(
    slots: &[TimetableSlot],
    faculty: &[Faculty],
    constraints: &Constraints,
) -> Result<Vec<Conflict>, GenerationError> {
    let mut conflicts = validator::validate(slots, faculty, constraints)?;
    conflicts.extend(advisor::advise(slots));
    Ok(conflicts)
}
