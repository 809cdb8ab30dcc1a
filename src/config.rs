use clap::Parser;
use log::info;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::data::Catalog;
use crate::error::ConfigError;

/// Command-line configuration of the timetable server.
#[derive(Debug, Clone, Parser)]
#[command(name = "timetable_engine", about = "Weekly timetable generation service")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// JSON file with subjects, faculty, classrooms and labs.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Default log filter; RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Reads the catalog file, or starts from an empty catalog when none was given.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        let Some(path) = &self.catalog else {
            return Ok(Catalog::default());
        };
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let catalog: Catalog = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display.clone(),
            source,
        })?;
        info!(
            "Loaded catalog {} with {} subjects, {} faculty, {} classrooms, {} labs",
            display,
            catalog.subjects.len(),
            catalog.faculty.len(),
            catalog.classrooms.len(),
            catalog.labs.len()
        );
        Ok(catalog)
    }
}
