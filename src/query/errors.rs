//! Query error types
//!
//! Error codes:
//! - BOOKING_QUERY_UNKNOWN_FIELD
//! - BOOKING_QUERY_UNKNOWN_OPERATOR
//! - BOOKING_QUERY_INVALID_OPERATOR
//! - BOOKING_QUERY_UNSUPPORTED_FIELD_TYPE
//! - BOOKING_QUERY_MALFORMED_LITERAL
//! - BOOKING_QUERY_UNKNOWN_SORT_FIELD
//! - BOOKING_QUERY_MALFORMED_CONDITION
//! - BOOKING_QUERY_INVALID_SORT_DIRECTION
//! - BOOKING_QUERY_FIELD_TYPE_MISMATCH
//! - BOOKING_QUERY_MISSING_ORDERED_VALUE
//!
//! Every query error is a deterministic function of the input text, so
//! all of them are `BadRequest` and none are retried.

use std::fmt;

use thiserror::Error;

use super::operator::Operator;
use crate::schema::FieldType;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Caller-facing classification of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected input, fix the request
    BadRequest,
    /// Fault inside the service, not caused by input
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filter and sort errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Field name not declared on the entity schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Operator token outside the supported set
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Operator not legal for the field's value type
    #[error("Invalid operator for {field_type}: {op}")]
    InvalidOperatorForType { op: Operator, field_type: FieldType },

    /// Field exists but its declared type cannot be queried
    #[error("Unsupported field type for '{field}': {field_type}")]
    UnsupportedFieldType { field: String, field_type: FieldType },

    /// Literal could not be parsed as the field's declared type
    #[error("Malformed {field_type} literal for '{field}': '{value}'")]
    MalformedLiteral {
        field: String,
        field_type: FieldType,
        value: String,
    },

    /// Sort field not declared on the entity schema
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    /// Condition text does not match the grammar (strict mode only)
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    /// Sort direction other than ASC/DESC (strict mode only)
    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),

    /// Filter descriptor applied to a field of a different type
    #[error("Filter for '{field}' expects {expected}, field is {actual}")]
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        actual: FieldType,
    },

    /// Ordering comparison against an absent value
    #[error("Field '{field}' has no value to compare")]
    MissingOrderedValue { field: String },
}

impl QueryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::UnknownField(_) => "BOOKING_QUERY_UNKNOWN_FIELD",
            QueryError::UnknownOperator(_) => "BOOKING_QUERY_UNKNOWN_OPERATOR",
            QueryError::InvalidOperatorForType { .. } => "BOOKING_QUERY_INVALID_OPERATOR",
            QueryError::UnsupportedFieldType { .. } => "BOOKING_QUERY_UNSUPPORTED_FIELD_TYPE",
            QueryError::MalformedLiteral { .. } => "BOOKING_QUERY_MALFORMED_LITERAL",
            QueryError::UnknownSortField(_) => "BOOKING_QUERY_UNKNOWN_SORT_FIELD",
            QueryError::MalformedCondition(_) => "BOOKING_QUERY_MALFORMED_CONDITION",
            QueryError::InvalidSortDirection(_) => "BOOKING_QUERY_INVALID_SORT_DIRECTION",
            QueryError::FieldTypeMismatch { .. } => "BOOKING_QUERY_FIELD_TYPE_MISMATCH",
            QueryError::MissingOrderedValue { .. } => "BOOKING_QUERY_MISSING_ORDERED_VALUE",
        }
    }

    /// Every query error is a bad request
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::BadRequest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            QueryError::UnknownField("x".into()).code(),
            "BOOKING_QUERY_UNKNOWN_FIELD"
        );
        assert_eq!(
            QueryError::UnknownSortField("x".into()).code(),
            "BOOKING_QUERY_UNKNOWN_SORT_FIELD"
        );
        assert_eq!(
            QueryError::InvalidOperatorForType {
                op: Operator::Gt,
                field_type: FieldType::String,
            }
            .code(),
            "BOOKING_QUERY_INVALID_OPERATOR"
        );
    }

    #[test]
    fn test_all_bad_request() {
        let errors = [
            QueryError::UnknownOperator("like".into()),
            QueryError::MalformedCondition("name".into()),
            QueryError::MissingOrderedValue { field: "checkIn".into() },
        ];
        for err in errors {
            assert_eq!(err.category(), ErrorCategory::BadRequest);
        }
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::InvalidOperatorForType {
            op: Operator::In,
            field_type: FieldType::Date,
        };
        assert_eq!(err.to_string(), "Invalid operator for date: has");

        let err = QueryError::MalformedLiteral {
            field: "checkIn".into(),
            field_type: FieldType::Date,
            value: "2024-13-01".into(),
        };
        assert!(err.to_string().contains("2024-13-01"));
    }
}
