//! Query model structures
//!
//! Built fresh per request by the parser, consumed by the compiler,
//! then dropped. None of these carry identity beyond one query.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::filter::FilterDescriptor;

/// Conjunction of per-field filters, at most one per field name.
///
/// Keeps first-insertion order of field names so that compiled
/// predicates and explain output are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescriptor {
    entries: Vec<(String, FilterDescriptor)>,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a filter, replacing any earlier filter on the same field.
    ///
    /// Returns the replaced filter, if any.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        filter: FilterDescriptor,
    ) -> Option<FilterDescriptor> {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => Some(std::mem::replace(existing, filter)),
            None => {
                self.entries.push((field, filter));
                None
            }
        }
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, filter: FilterDescriptor) -> Self {
        self.insert(field, filter);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FilterDescriptor> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterDescriptor)> {
        self.entries.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for QueryDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, filter) in &self.entries {
            map.serialize_entry(field, filter)?;
        }
        map.end()
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortField {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub ascending: bool,
}

impl SortField {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Ordered sort keys: primary first, ties broken by the next key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortField>);

impl SortSpec {
    pub fn new(fields: Vec<SortField>) -> Self {
        Self(fields)
    }

    /// Appends a tie-break key
    pub fn then(mut self, field: SortField) -> Self {
        self.0.push(field);
        self
    }

    pub fn fields(&self) -> &[SortField] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
