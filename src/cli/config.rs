//! Configuration file handling
//!
//! ```json
//! {
//!   "data_file": "bookings.json",
//!   "log_level": "info",
//!   "strict_conditions": false,
//!   "strict_sort_direction": false
//! }
//! ```
//!
//! A relative `data_file` is resolved against the config file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::booking::{Booking, BookingStore};
use crate::observability::Severity;
use crate::query::ParseOptions;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON array of bookings (required)
    pub data_file: PathBuf,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reject malformed filter conditions instead of skipping them
    #[serde(default)]
    pub strict_conditions: bool,

    /// Reject sort directions other than ASC/DESC
    #[serde(default)]
    pub strict_sort_direction: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if config.data_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_file = dir.join(&config.data_file);
            }
        }

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Filter and sort parsing policy
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_conditions: self.strict_conditions,
            strict_sort_direction: self.strict_sort_direction,
        }
    }

    /// Reads the data file into a fresh store
    pub fn load_store(&self) -> CliResult<BookingStore> {
        let content = fs::read_to_string(&self.data_file).map_err(|e| {
            CliError::data_error(format!(
                "Failed to read data file {}: {}",
                self.data_file.display(),
                e
            ))
        })?;

        let bookings: Vec<Booking> = serde_json::from_str(&content)
            .map_err(|e| CliError::data_error(format!("Invalid data file JSON: {}", e)))?;

        BookingStore::from_records(bookings)
            .map_err(|e| CliError::data_error(format!("Invalid booking in data file: {}", e)))
    }
}
