//! Greedy weekly timetable generation for theory lectures and lab sessions.

pub mod advisor;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod placement;
pub mod preflight;
pub mod server;
pub mod service;
pub mod solver;
pub mod stats;
pub mod store;
pub mod validator;

pub use data::{
    Batch, Catalog, Classroom, ClassroomShift, Conflict, ConflictType, Constraints, Faculty,
    GenerationInput, GenerationOutput, Lab, SessionType, Severity, Subject, TimetableSlot, Year,
};
pub use grid::Day;
pub use solver::{generate, generate_around, review, solve};
