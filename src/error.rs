use thiserror::Error;

use crate::data::Conflict;

/// Failures that abort a whole generation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("malformed time range '{0}'")]
    MalformedTimeRange(String),

    #[error("time '{0}' does not start on a canonical slot")]
    UnknownTimeSlot(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("slot '{0}' is already stored")]
    DuplicateSlot(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("configuration is not valid for generation ({} conflicts)", .0.len())]
    InvalidConfiguration(Vec<Conflict>),

    #[error("no timetable slots were generated")]
    EmptyTimetable(Vec<Conflict>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
