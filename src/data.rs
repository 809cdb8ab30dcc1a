use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Day;

// Type aliases for clarity; entities are joined by these human-readable keys
pub type SubjectCode = String;
pub type FacultyName = String;
pub type RoomName = String;

/// Academic cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Year {
    SE,
    TE,
    BE,
}

impl Year {
    /// Fixed order in which years are scheduled.
    pub const ALL: [Year; 3] = [Year::SE, Year::TE, Year::BE];
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Year::SE => "SE",
            Year::TE => "TE",
            Year::BE => "BE",
        };
        f.write_str(name)
    }
}

/// Lab sub-division of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Batch {
    A,
    B,
    C,
}

impl Batch {
    pub const ALL: [Batch; 3] = [Batch::A, Batch::B, Batch::C];
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Batch::A => "A",
            Batch::B => "B",
            Batch::C => "C",
        };
        f.write_str(name)
    }
}

/// Working hours of a classroom, selecting which theory slots it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ClassroomShift {
    #[serde(rename = "8AM-3PM")]
    Early,
    #[serde(rename = "10AM-5PM")]
    Late,
}

/// A course with weekly lecture and lab hours.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub code: SubjectCode,
    pub name: String,
    pub year: Year,
    pub semester: u32,
    pub theory_hours: u32,
    pub lab_hours: u32,
    pub faculty: FacultyName,
}

/// A teacher; `name` is the join key used by subjects and slots.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub name: FacultyName,
    pub max_hours_per_day: u32,
    /// Subject codes this teacher is qualified for.
    #[serde(default)]
    pub subjects: Vec<SubjectCode>,
    // advisory only, never enforced by placement
    #[serde(default)]
    pub preferred_slots: Vec<String>,
    #[serde(default)]
    pub unavailable_slots: Vec<String>,
}

/// Lecture room dedicated to one year.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub name: RoomName,
    pub assigned_year: Year,
    pub time_slot: ClassroomShift,
}

/// Laboratory room, usable by any year and batch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lab {
    pub name: RoomName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Theory,
    Lab,
}

/// A single placed session in the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlot {
    /// Identity key: `year[-batch]-code-day-time`.
    pub id: String,
    pub day: Day,
    pub time: String,
    pub subject: String,
    pub faculty: FacultyName,
    pub room: RoomName,
    #[serde(rename = "type")]
    pub kind: SessionType,
    pub year: Year,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<Batch>,
    pub duration: u32,
    pub semester: u32,
}

/// Knobs for a generation run. Only `max_consecutive_hours` is read by the
/// engine; the rest travel with the request untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraints {
    pub max_hours_per_day: u32,
    pub min_break_between_classes: u32,
    pub max_consecutive_hours: u32,
    pub prioritize_lab_afternoon: bool,
    pub allow_back_to_back_theory: bool,
    pub faculty_rest_slots: u32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_hours_per_day: 6,
            min_break_between_classes: 15,
            max_consecutive_hours: 3,
            prioritize_lab_afternoon: true,
            allow_back_to_back_theory: false,
            faculty_rest_slots: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A diagnostic produced while generating or checking a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictType,
    pub message: String,
    pub severity: Severity,
    pub affected_entities: Vec<String>,
}

impl Conflict {
    pub fn new<I, S>(
        kind: ConflictType,
        severity: Severity,
        message: impl Into<String>,
        affected: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            message: message.into(),
            severity,
            affected_entities: affected.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ConflictType::Error
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}/{:?}] {}", self.kind, self.severity, self.message)
    }
}

/// The entity collections the engine draws from.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
    pub faculty: Vec<Faculty>,
    pub classrooms: Vec<Classroom>,
    pub labs: Vec<Lab>,
}

/// The complete input for one generation call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub labs: Vec<Lab>,
    #[serde(default)]
    pub constraints: Constraints,
}

/// The final output of the engine.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub slots: Vec<TimetableSlot>,
    pub conflicts: Vec<Conflict>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_wire_format() {
        let slot = TimetableSlot {
            id: "SE-A-DS-Monday-1:15-3:15".into(),
            day: Day::Monday,
            time: "1:15-3:15".into(),
            subject: "Data Structures Lab".into(),
            faculty: "Dr. X".into(),
            room: "Lab 1".into(),
            kind: SessionType::Lab,
            year: Year::SE,
            batch: Some(Batch::A),
            duration: 2,
            semester: 3,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["type"], "lab");
        assert_eq!(json["day"], "Monday");
        assert_eq!(json["batch"], "A");
        assert_eq!(json["year"], "SE");
    }

    #[test]
    fn test_theory_slot_omits_batch() {
        let slot = TimetableSlot {
            id: "TE-CN-Friday-8:00-9:00".into(),
            day: Day::Friday,
            time: "8:00-9:00".into(),
            subject: "Computer Networks".into(),
            faculty: "Dr. Kumar".into(),
            room: "Room A-102".into(),
            kind: SessionType::Theory,
            year: Year::TE,
            batch: None,
            duration: 1,
            semester: 5,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("batch").is_none());
    }

    #[test]
    fn test_classroom_shift_names() {
        let room: Classroom = serde_json::from_str(
            r#"{"name":"Room A-101","assignedYear":"SE","timeSlot":"10AM-5PM"}"#,
        )
        .unwrap();
        assert_eq!(room.time_slot, ClassroomShift::Late);
        assert_eq!(room.assigned_year, Year::SE);
    }

    #[test]
    fn test_constraints_fill_defaults() {
        let constraints: Constraints =
            serde_json::from_str(r#"{"maxConsecutiveHours":2}"#).unwrap();
        assert_eq!(constraints.max_consecutive_hours, 2);
        assert_eq!(constraints.faculty_rest_slots, 1);
        assert!(constraints.prioritize_lab_afternoon);
    }

    #[test]
    fn test_conflict_display() {
        let conflict = Conflict::new(
            ConflictType::Warning,
            Severity::Medium,
            "Faculty conflict",
            ["Dr. X"],
        );
        assert_eq!(conflict.to_string(), "[Warning/Medium] Faculty conflict");
        assert_eq!(conflict.affected_entities, vec!["Dr. X".to_string()]);
    }
}
