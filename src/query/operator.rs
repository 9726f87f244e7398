//! # Comparison Operators
//!
//! Closed set of operators accepted in filter text, and which value types
//! each one is legal for.

use std::fmt;

use serde::{Serialize, Serializer};

use super::errors::{QueryError, QueryResult};
use crate::schema::FieldType;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equals
    Eq,

    /// Not equals
    Neq,

    /// Substring containment (`has`)
    In,

    /// Greater than
    Gt,

    /// Less than
    Lt,

    /// Greater than or equal
    Gte,

    /// Less than or equal
    Lte,
}

const STRING_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Neq, Operator::In];

const DATE_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
];

const ID_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Neq];

impl Operator {
    /// Parse an operator token, case-insensitively.
    ///
    /// `has` maps to [`Operator::In`].
    pub fn parse(token: &str) -> QueryResult<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" => Ok(Operator::Eq),
            "neq" => Ok(Operator::Neq),
            "has" => Ok(Operator::In),
            "gt" => Ok(Operator::Gt),
            "lt" => Ok(Operator::Lt),
            "gte" => Ok(Operator::Gte),
            "lte" => Ok(Operator::Lte),
            _ => Err(QueryError::UnknownOperator(token.to_string())),
        }
    }

    /// Get the canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::In => "has",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
        }
    }

    /// Returns true for the chronological comparisons
    pub fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte)
    }

    /// Operators legal for a declared field type
    pub fn allowed_for(field_type: FieldType) -> &'static [Operator] {
        match field_type {
            FieldType::String => STRING_OPERATORS,
            FieldType::Date => DATE_OPERATORS,
            FieldType::Id => ID_OPERATORS,
            FieldType::Unsupported(_) => &[],
        }
    }

    /// Fails with `InvalidOperatorForType` unless legal for `field_type`
    pub(crate) fn check_for(self, field_type: FieldType) -> QueryResult<Self> {
        if Self::allowed_for(field_type).contains(&self) {
            Ok(self)
        } else {
            Err(QueryError::InvalidOperatorForType {
                op: self,
                field_type,
            })
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
