//! Entity schema definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - date: calendar date (no time, no zone)
//! - id: UUID identifier
//!
//! Any other declared type is carried as `Unsupported` so the parser can
//! reject it by name instead of pretending the field does not exist.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Declared semantic type of an entity field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Calendar date
    Date,
    /// UUID identifier
    Id,
    /// Present on the entity but not queryable
    Unsupported(&'static str),
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Id => "id",
            FieldType::Unsupported(name) => *name,
        }
    }

    /// Returns true if filters and sorts can target this type
    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldType::Unsupported(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

/// Statically defined accessor for one field of `E`.
///
/// The variant fixes the declared type, so a schema table cannot claim
/// one type and hand back another.
pub enum FieldAccessor<E> {
    Str(for<'a> fn(&'a E) -> Option<&'a str>),
    Date(fn(&E) -> Option<NaiveDate>),
    Id(fn(&E) -> Option<Uuid>),
    /// Field exists but has no queryable representation
    Opaque(&'static str),
}

impl<E> FieldAccessor<E> {
    /// Returns the declared type of the accessed field
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldAccessor::Str(_) => FieldType::String,
            FieldAccessor::Date(_) => FieldType::Date,
            FieldAccessor::Id(_) => FieldType::Id,
            FieldAccessor::Opaque(name) => FieldType::Unsupported(*name),
        }
    }
}

// Manual impls: a derive would demand `E: Clone`, which fn pointers don't need.
impl<E> Clone for FieldAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FieldAccessor<E> {}

impl<E> fmt::Debug for FieldAccessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldAccessor({})", self.field_type())
    }
}

/// One named field of an entity schema
pub struct FieldDef<E> {
    /// Field name as it appears in query text
    pub name: &'static str,
    /// Typed accessor
    pub accessor: FieldAccessor<E>,
}

impl<E> FieldDef<E> {
    pub const fn string(name: &'static str, get: for<'a> fn(&'a E) -> Option<&'a str>) -> Self {
        Self {
            name,
            accessor: FieldAccessor::Str(get),
        }
    }

    pub const fn date(name: &'static str, get: fn(&E) -> Option<NaiveDate>) -> Self {
        Self {
            name,
            accessor: FieldAccessor::Date(get),
        }
    }

    pub const fn id(name: &'static str, get: fn(&E) -> Option<Uuid>) -> Self {
        Self {
            name,
            accessor: FieldAccessor::Id(get),
        }
    }

    pub const fn opaque(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            accessor: FieldAccessor::Opaque(type_name),
        }
    }

    /// Returns the declared type of this field
    pub fn field_type(&self) -> FieldType {
        self.accessor.field_type()
    }
}

/// Fixed table of (field name, typed accessor) pairs for one entity kind.
///
/// Built once as a `static` and looked up by name at query time.
pub struct EntitySchema<E: 'static> {
    name: &'static str,
    fields: &'static [FieldDef<E>],
}

impl<E: 'static> EntitySchema<E> {
    /// Create a schema over a static field table
    pub const fn new(name: &'static str, fields: &'static [FieldDef<E>]) -> Self {
        Self { name, fields }
    }

    /// Returns the entity kind name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Looks up a field by exact (case-sensitive) name
    pub fn field(&self, name: &str) -> Option<&FieldDef<E>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the declared type of a field, if it exists
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field(name).map(FieldDef::field_type)
    }

    /// Returns all field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record kind the query engine can filter and sort
pub trait Entity: Sized + 'static {
    /// Returns the static schema table for this kind
    fn schema() -> &'static EntitySchema<Self>;

    /// Returns the unique identifier of this record
    fn id(&self) -> Uuid;
}
