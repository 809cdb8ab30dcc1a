//! Greedy placement of theory lectures and lab sessions.
//!
//! Each year (and, for labs, each year/batch pair) is filled by one
//! continuous walk over the week: a [`Cursor`] moves through the day's slots
//! and rolls to the next day when they run out. Subjects are taken in input
//! order and nothing is retried; every dropped hour or session is reported
//! as a conflict.

use log::{debug, trace, warn};
use std::collections::{HashMap, HashSet};

use crate::data::{
    Batch, Classroom, Conflict, ConflictType, Lab, SessionType, Severity, Subject, TimetableSlot,
    Year,
};
use crate::grid::{self, DAYS, Day};

/// Position of the next placement within a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub day: usize,
    pub slot: usize,
}

impl Cursor {
    /// Rolls over to the next day once the day's `slots_per_day` are used up.
    pub fn roll(self, slots_per_day: usize) -> Self {
        if self.slot >= slots_per_day {
            Self { day: self.day + 1, slot: 0 }
        } else {
            self
        }
    }

    pub fn advance(self) -> Self {
        Self { slot: self.slot + 1, ..self }
    }

    /// `None` once the week is exhausted.
    pub fn day(self) -> Option<Day> {
        DAYS.get(self.day).copied()
    }
}

/// Slots placed so far in one generation pass, indexed for collision checks.
#[derive(Debug, Default)]
pub struct Ledger {
    slots: Vec<TimetableSlot>,
    faculty_bookings: HashSet<(String, Day, String)>,
    lab_bookings: HashMap<(Day, String), HashSet<String>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faculty_busy(&self, faculty: &str, day: Day, time: &str) -> bool {
        self.faculty_bookings
            .contains(&(faculty.to_string(), day, time.to_string()))
    }

    pub fn lab_booked(&self, lab: &str, day: Day, time: &str) -> bool {
        self.lab_bookings
            .get(&(day, time.to_string()))
            .is_some_and(|rooms| rooms.contains(lab))
    }

    /// Starts a pass around slots that are already fixed elsewhere. Their
    /// faculty and lab bookings block placement, but they are not part of
    /// the pass output.
    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a TimetableSlot>) -> Self {
        let mut ledger = Self::new();
        for slot in reserved {
            ledger.book(slot);
        }
        ledger
    }

    pub fn push(&mut self, slot: TimetableSlot) {
        self.book(&slot);
        self.slots.push(slot);
    }

    fn book(&mut self, slot: &TimetableSlot) {
        self.faculty_bookings
            .insert((slot.faculty.clone(), slot.day, slot.time.clone()));
        if slot.kind == SessionType::Lab {
            self.lab_bookings
                .entry((slot.day, slot.time.clone()))
                .or_default()
                .insert(slot.room.clone());
        }
    }

    pub fn slots(&self) -> &[TimetableSlot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<TimetableSlot> {
        self.slots
    }
}

/// Finds the first lab, in input order, not already hosting a lab session at
/// `day`/`time`.
pub fn find_available_lab<'a>(
    labs: &'a [Lab],
    ledger: &Ledger,
    day: Day,
    time: &str,
) -> Option<&'a Lab> {
    labs.iter().find(|lab| !ledger.lab_booked(&lab.name, day, time))
}

/// Places every theory hour of every year.
pub fn place_theory(
    subjects: &[Subject],
    classrooms: &[Classroom],
    ledger: &mut Ledger,
    conflicts: &mut Vec<Conflict>,
) {
    for year in Year::ALL {
        let year_subjects: Vec<&Subject> = subjects.iter().filter(|s| s.year == year).collect();
        // a year with nothing to teach never needs its classroom
        if year_subjects.is_empty() {
            continue;
        }

        let Some(classroom) = classrooms.iter().find(|c| c.assigned_year == year) else {
            warn!("No classroom assigned for year {}", year);
            conflicts.push(Conflict::new(
                ConflictType::Error,
                Severity::High,
                format!("No classroom assigned for year {}", year),
                [year.to_string()],
            ));
            continue;
        };

        let available = grid::available_theory_slots(classroom.time_slot);
        debug!(
            "Placing theory for {} in {} ({} slots/day)",
            year,
            classroom.name,
            available.len()
        );

        let mut cursor = Cursor::default();
        for subject in year_subjects {
            cursor = place_theory_hours(cursor, subject, classroom, available, ledger, conflicts);
        }
    }
}

fn place_theory_hours(
    mut cursor: Cursor,
    subject: &Subject,
    classroom: &Classroom,
    available: &[&str],
    ledger: &mut Ledger,
    conflicts: &mut Vec<Conflict>,
) -> Cursor {
    let year = subject.year;
    for _ in 0..subject.theory_hours {
        cursor = cursor.roll(available.len());
        let Some(day) = cursor.day() else {
            conflicts.push(Conflict::new(
                ConflictType::Warning,
                Severity::Medium,
                format!("Insufficient slots for {} in {}", subject.name, year),
                [subject.name.clone(), year.to_string()],
            ));
            break;
        };
        let time = available[cursor.slot];

        if ledger.faculty_busy(&subject.faculty, day, time) {
            trace!("Dropping {} on {} at {}: faculty busy", subject.code, day, time);
            conflicts.push(Conflict::new(
                ConflictType::Warning,
                Severity::Medium,
                format!("Faculty conflict for {} on {} at {}", subject.faculty, day, time),
                [subject.faculty.clone(), subject.name.clone()],
            ));
        } else {
            ledger.push(TimetableSlot {
                id: format!("{}-{}-{}-{}", year, subject.code, day, time),
                day,
                time: time.to_string(),
                subject: subject.name.clone(),
                faculty: subject.faculty.clone(),
                room: classroom.name.clone(),
                kind: SessionType::Theory,
                year,
                batch: None,
                duration: 1,
                semester: subject.semester,
            });
        }

        cursor = cursor.advance();
    }
    cursor
}

/// Places every lab session, once per batch of each year.
pub fn place_labs(
    subjects: &[Subject],
    labs: &[Lab],
    ledger: &mut Ledger,
    conflicts: &mut Vec<Conflict>,
) {
    for year in Year::ALL {
        for batch in Batch::ALL {
            debug!("Placing labs for {}-{}", year, batch);
            let mut cursor = Cursor::default();
            for subject in subjects
                .iter()
                .filter(|s| s.year == year && s.lab_hours > 0)
            {
                cursor = place_lab_sessions(cursor, subject, batch, labs, ledger, conflicts);
            }
        }
    }
}

fn place_lab_sessions(
    mut cursor: Cursor,
    subject: &Subject,
    batch: Batch,
    labs: &[Lab],
    ledger: &mut Ledger,
    conflicts: &mut Vec<Conflict>,
) -> Cursor {
    let year = subject.year;
    let group = format!("{}-{}", year, batch);
    let sessions = subject.lab_hours.div_ceil(2);

    for _ in 0..sessions {
        cursor = cursor.roll(grid::LAB_SLOTS.len());
        let Some(day) = cursor.day() else {
            conflicts.push(Conflict::new(
                ConflictType::Warning,
                Severity::Medium,
                format!("Insufficient lab slots for {} - {}", subject.name, group),
                [subject.name.clone(), group.clone()],
            ));
            break;
        };
        let time = grid::LAB_SLOTS[cursor.slot];

        match find_available_lab(labs, ledger, day, time) {
            None => {
                trace!("No lab free for {} {} on {} at {}", subject.code, group, day, time);
                conflicts.push(Conflict::new(
                    ConflictType::Warning,
                    Severity::Medium,
                    format!("No available lab for {} - {} on {}", subject.name, group, day),
                    [subject.name.clone(), group.clone()],
                ));
            }
            Some(lab) => {
                ledger.push(TimetableSlot {
                    id: format!("{}-{}-{}-{}-{}", year, batch, subject.code, day, time),
                    day,
                    time: time.to_string(),
                    subject: format!("{} Lab", subject.name),
                    faculty: subject.faculty.clone(),
                    room: lab.name.clone(),
                    kind: SessionType::Lab,
                    year,
                    batch: Some(batch),
                    duration: 2,
                    semester: subject.semester,
                });
            }
        }

        cursor = cursor.advance();
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ClassroomShift;

    fn subject(code: &str, year: Year, theory: u32, lab: u32, faculty: &str) -> Subject {
        Subject {
            code: code.into(),
            name: format!("{} Name", code),
            year,
            semester: 3,
            theory_hours: theory,
            lab_hours: lab,
            faculty: faculty.into(),
        }
    }

    fn classroom(name: &str, year: Year, shift: ClassroomShift) -> Classroom {
        Classroom {
            name: name.into(),
            assigned_year: year,
            time_slot: shift,
        }
    }

    fn lab(name: &str) -> Lab {
        Lab { name: name.into() }
    }

    fn count(conflicts: &[Conflict], needle: &str) -> usize {
        conflicts.iter().filter(|c| c.message.contains(needle)).count()
    }

    #[test]
    fn test_cursor_rolls_to_next_day() {
        let cursor = Cursor { day: 0, slot: 6 }.roll(6);
        assert_eq!(cursor, Cursor { day: 1, slot: 0 });
        assert_eq!(cursor.day(), Some(Day::Tuesday));
        assert_eq!(Cursor { day: 5, slot: 0 }.day(), None);
    }

    #[test]
    fn test_theory_walk_is_shared_across_subjects() {
        let subjects = vec![
            subject("A", Year::SE, 4, 0, "F1"),
            subject("B", Year::SE, 3, 0, "F2"),
        ];
        let rooms = vec![classroom("R1", Year::SE, ClassroomShift::Early)];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_theory(&subjects, &rooms, &mut ledger, &mut conflicts);

        let slots = ledger.slots();
        assert_eq!(slots.len(), 7);
        assert_eq!(slots[4].subject, "B Name");
        assert_eq!((slots[4].day, slots[4].time.as_str()), (Day::Monday, "1:15-2:15"));
        assert_eq!((slots[6].day, slots[6].time.as_str()), (Day::Tuesday, "8:00-9:00"));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_missing_classroom_skips_year() {
        let subjects = vec![
            subject("A", Year::SE, 2, 0, "F1"),
            subject("B", Year::BE, 2, 0, "F2"),
        ];
        let rooms = vec![classroom("R1", Year::SE, ClassroomShift::Early)];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_theory(&subjects, &rooms, &mut ledger, &mut conflicts);

        assert_eq!(ledger.slots().len(), 2);
        assert!(ledger.slots().iter().all(|s| s.year == Year::SE));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, Severity::High);
        assert_eq!(conflicts[0].message, "No classroom assigned for year BE");
    }

    #[test]
    fn test_lab_only_year_still_needs_classroom() {
        let subjects = vec![subject("A", Year::TE, 0, 2, "F1")];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_theory(&subjects, &[], &mut ledger, &mut conflicts);

        assert!(ledger.slots().is_empty());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].message, "No classroom assigned for year TE");
    }

    #[test]
    fn test_reserved_bookings_block_placement() {
        let reserved = TimetableSlot {
            id: "BE-A-ML-Monday-1:15-3:15".into(),
            day: Day::Monday,
            time: "1:15-3:15".into(),
            subject: "ML Lab".into(),
            faculty: "F9".into(),
            room: "L1".into(),
            kind: SessionType::Lab,
            year: Year::BE,
            batch: Some(Batch::A),
            duration: 2,
            semester: 7,
        };
        let subjects = vec![subject("A", Year::SE, 0, 2, "F1")];
        let labs = vec![lab("L1"), lab("L2")];
        let mut ledger = Ledger::with_reserved([&reserved]);
        let mut conflicts = Vec::new();

        place_labs(&subjects, &labs, &mut ledger, &mut conflicts);

        let rooms: Vec<_> = ledger.slots().iter().map(|s| s.room.as_str()).collect();
        assert_eq!(rooms, ["L2"]);
        assert_eq!(count(&conflicts, "No available lab for A Name - SE-B on Monday"), 1);
        assert!(ledger.faculty_busy("F9", Day::Monday, "1:15-3:15"));
    }

    #[test]
    fn test_late_shift_starts_mid_morning() {
        let subjects = vec![subject("A", Year::TE, 1, 0, "F1")];
        let rooms = vec![classroom("R2", Year::TE, ClassroomShift::Late)];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_theory(&subjects, &rooms, &mut ledger, &mut conflicts);

        assert_eq!(ledger.slots()[0].time, "10:15-11:15");
        assert_eq!(ledger.slots()[0].id, "TE-A-Monday-10:15-11:15");
    }

    #[test]
    fn test_week_exhaustion_drops_remaining_hours() {
        let subjects = vec![
            subject("A", Year::SE, 32, 0, "F1"),
            subject("B", Year::SE, 2, 0, "F2"),
        ];
        let rooms = vec![classroom("R1", Year::SE, ClassroomShift::Early)];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_theory(&subjects, &rooms, &mut ledger, &mut conflicts);

        assert_eq!(ledger.slots().len(), 30);
        assert_eq!(count(&conflicts, "Insufficient slots for A Name in SE"), 1);
        assert_eq!(count(&conflicts, "Insufficient slots for B Name in SE"), 1);
    }

    #[test]
    fn test_faculty_double_booking_across_years() {
        // both walks land on Monday 10:15 for F1
        let subjects = vec![
            subject("A", Year::SE, 3, 0, "F1"),
            subject("B", Year::TE, 1, 0, "F1"),
        ];
        let rooms = vec![
            classroom("R1", Year::SE, ClassroomShift::Early),
            classroom("R2", Year::TE, ClassroomShift::Late),
        ];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_theory(&subjects, &rooms, &mut ledger, &mut conflicts);

        assert_eq!(ledger.slots().len(), 3);
        assert_eq!(count(&conflicts, "Faculty conflict for F1 on Monday at 10:15-11:15"), 1);
        let at_1015 = ledger
            .slots()
            .iter()
            .filter(|s| s.faculty == "F1" && s.time == "10:15-11:15")
            .count();
        assert_eq!(at_1015, 1);
    }

    #[test]
    fn test_lab_sessions_round_up() {
        let subjects = vec![subject("A", Year::SE, 0, 3, "F1")];
        let labs = vec![lab("L1"), lab("L2"), lab("L3")];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_labs(&subjects, &labs, &mut ledger, &mut conflicts);

        // two sessions for each of the three batches
        assert_eq!(ledger.slots().len(), 6);
        assert!(conflicts.is_empty());
        let batch_a: Vec<_> = ledger
            .slots()
            .iter()
            .filter(|s| s.batch == Some(Batch::A))
            .collect();
        assert_eq!(batch_a[0].time, "1:15-3:15");
        assert_eq!(batch_a[1].time, "3:15-5:15");
        assert_eq!(batch_a[0].subject, "A Name Lab");
        assert_eq!(batch_a[0].duration, 2);
        assert_eq!(batch_a[0].id, "SE-A-A-Monday-1:15-3:15");
    }

    #[test]
    fn test_lab_allocator_skips_booked_rooms() {
        let subjects = vec![subject("A", Year::SE, 0, 2, "F1")];
        let labs = vec![lab("L1"), lab("L2")];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_labs(&subjects, &labs, &mut ledger, &mut conflicts);

        let rooms: Vec<_> = ledger.slots().iter().map(|s| s.room.as_str()).collect();
        assert_eq!(rooms, ["L1", "L2"]);
        assert_eq!(count(&conflicts, "No available lab for A Name - SE-C on Monday"), 1);
    }

    #[test]
    fn test_find_available_lab_ignores_theory_rooms() {
        let mut ledger = Ledger::new();
        ledger.push(TimetableSlot {
            id: "x".into(),
            day: Day::Monday,
            time: "1:15-3:15".into(),
            subject: "S".into(),
            faculty: "F".into(),
            room: "L1".into(),
            kind: SessionType::Theory,
            year: Year::SE,
            batch: None,
            duration: 1,
            semester: 1,
        });
        let labs = vec![lab("L1")];
        let found = find_available_lab(&labs, &ledger, Day::Monday, "1:15-3:15");
        assert_eq!(found.map(|l| l.name.as_str()), Some("L1"));
    }

    #[test]
    fn test_lab_week_exhaustion() {
        let subjects = vec![subject("A", Year::BE, 0, 22, "F1")];
        let labs = vec![lab("L1"), lab("L2"), lab("L3")];
        let mut ledger = Ledger::new();
        let mut conflicts = Vec::new();

        place_labs(&subjects, &labs, &mut ledger, &mut conflicts);

        // 11 sessions wanted, 10 blocks per week
        assert_eq!(ledger.slots().len(), 30);
        assert_eq!(count(&conflicts, "Insufficient lab slots for A Name - BE-"), 3);
    }
}
