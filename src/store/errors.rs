//! Store error types
//!
//! Error codes:
//! - BOOKING_STORE_VALIDATION (bad request)
//! - BOOKING_STORE_DUPLICATE_ID (bad request)
//! - BOOKING_STORE_POISONED (internal)
//! - query errors keep their own BOOKING_QUERY_* code

use thiserror::Error;
use uuid::Uuid;

use crate::query::{ErrorCategory, QueryError};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Record failed its own validation rules
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A record with this id is already stored
    #[error("Duplicate id: {0}")]
    DuplicateId(Uuid),

    /// Filter or sort rejected
    #[error("{0}")]
    Query(#[from] QueryError),

    /// A writer panicked while holding the lock
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        StoreError::Validation(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "BOOKING_STORE_VALIDATION",
            StoreError::DuplicateId(_) => "BOOKING_STORE_DUPLICATE_ID",
            StoreError::Query(err) => err.code(),
            StoreError::Poisoned => "BOOKING_STORE_POISONED",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StoreError::Validation(_) | StoreError::DuplicateId(_) => ErrorCategory::BadRequest,
            StoreError::Query(err) => err.category(),
            StoreError::Poisoned => ErrorCategory::Internal,
        }
    }
}
