//! CLI-specific error types
//!
//! Query and store errors keep their own code and category; the CLI only
//! adds codes for its own failures:
//! - BOOKING_CLI_CONFIG_ERROR
//! - BOOKING_CLI_DATA_ERROR
//! - BOOKING_CLI_IO_ERROR

use std::io;

use thiserror::Error;

use crate::query::{ErrorCategory, QueryError};
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing, unreadable or invalid
    #[error("{0}")]
    Config(String),

    /// Data file missing, unreadable or holding invalid bookings
    #[error("{0}")]
    Data(String),

    /// stdout/stderr failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Response encoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    /// Data file error
    pub fn data_error(msg: impl Into<String>) -> Self {
        CliError::Data(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "BOOKING_CLI_CONFIG_ERROR",
            CliError::Data(_) => "BOOKING_CLI_DATA_ERROR",
            CliError::Io(_) | CliError::Json(_) => "BOOKING_CLI_IO_ERROR",
            CliError::Query(err) => err.code(),
            CliError::Store(err) => err.code(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CliError::Config(_) | CliError::Data(_) => ErrorCategory::BadRequest,
            CliError::Io(_) | CliError::Json(_) => ErrorCategory::Internal,
            CliError::Query(err) => err.category(),
            CliError::Store(err) => err.category(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            CliError::config_error("x").code(),
            "BOOKING_CLI_CONFIG_ERROR"
        );
        assert_eq!(
            CliError::from(QueryError::UnknownField("rating".into())).code(),
            "BOOKING_QUERY_UNKNOWN_FIELD"
        );
        assert_eq!(
            CliError::from(StoreError::Poisoned).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_message_is_inner_message() {
        let err = CliError::from(QueryError::UnknownSortField("rating".into()));
        assert_eq!(err.to_string(), "Unknown sort field: rating");
    }
}
