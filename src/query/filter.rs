//! # Filter Descriptors
//!
//! Typed (operator, literal) pairs, one variant per value type. Operator
//! legality is checked at construction, so a descriptor that exists is
//! always legal for its type.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::errors::{QueryError, QueryResult};
use super::operator::Operator;
use crate::schema::{FieldAccessor, FieldType};

/// Compiled boolean test over one entity
pub type EntityPredicate<E> = Box<dyn Fn(&E) -> QueryResult<bool>>;

pub(super) fn boxed<E>(f: impl Fn(&E) -> QueryResult<bool> + 'static) -> EntityPredicate<E> {
    Box::new(f)
}

/// String literal filter: `eq`, `neq`, `has`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringFilter {
    value: String,
    operator: Operator,
}

impl StringFilter {
    pub fn new(value: impl Into<String>, operator: Operator) -> QueryResult<Self> {
        Ok(Self {
            operator: operator.check_for(FieldType::String)?,
            value: value.into(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    fn predicate<E: 'static>(
        &self,
        get: for<'a> fn(&'a E) -> Option<&'a str>,
    ) -> QueryResult<EntityPredicate<E>> {
        let value = self.value.clone();

        match self.operator {
            Operator::Eq => Ok(boxed(move |e| Ok(get(e) == Some(value.as_str())))),
            Operator::Neq => Ok(boxed(move |e| Ok(get(e) != Some(value.as_str())))),
            // Case-sensitive containment; absent never matches
            Operator::In => Ok(boxed(move |e| {
                Ok(get(e).is_some_and(|actual| actual.contains(value.as_str())))
            })),
            op @ (Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte) => {
                Err(QueryError::InvalidOperatorForType {
                    op,
                    field_type: FieldType::String,
                })
            }
        }
    }
}

/// Calendar date filter: `eq`, `neq`, `gt`, `lt`, `gte`, `lte`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    value: NaiveDate,
    operator: Operator,
}

impl DateFilter {
    pub fn new(value: NaiveDate, operator: Operator) -> QueryResult<Self> {
        Ok(Self {
            operator: operator.check_for(FieldType::Date)?,
            value,
        })
    }

    pub fn value(&self) -> NaiveDate {
        self.value
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    fn predicate<E: 'static>(
        &self,
        field: &str,
        get: fn(&E) -> Option<NaiveDate>,
    ) -> QueryResult<EntityPredicate<E>> {
        let value = self.value;

        match self.operator {
            Operator::Eq => Ok(boxed(move |e| Ok(get(e) == Some(value)))),
            Operator::Neq => Ok(boxed(move |e| Ok(get(e) != Some(value)))),
            Operator::Gt => Ok(ordered(field, get, value, |a, b| a > b)),
            Operator::Lt => Ok(ordered(field, get, value, |a, b| a < b)),
            Operator::Gte => Ok(ordered(field, get, value, |a, b| a >= b)),
            Operator::Lte => Ok(ordered(field, get, value, |a, b| a <= b)),
            Operator::In => Err(QueryError::InvalidOperatorForType {
                op: Operator::In,
                field_type: FieldType::Date,
            }),
        }
    }
}

/// Ordering comparison that refuses absent values instead of matching false
fn ordered<E: 'static>(
    field: &str,
    get: fn(&E) -> Option<NaiveDate>,
    bound: NaiveDate,
    holds: fn(NaiveDate, NaiveDate) -> bool,
) -> EntityPredicate<E> {
    let field = field.to_string();

    boxed(move |e| match get(e) {
        Some(actual) => Ok(holds(actual, bound)),
        None => Err(QueryError::MissingOrderedValue {
            field: field.clone(),
        }),
    })
}

/// Identifier filter: `eq`, `neq`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdFilter {
    value: Uuid,
    operator: Operator,
}

impl IdFilter {
    pub fn new(value: Uuid, operator: Operator) -> QueryResult<Self> {
        Ok(Self {
            operator: operator.check_for(FieldType::Id)?,
            value,
        })
    }

    pub fn value(&self) -> Uuid {
        self.value
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    fn predicate<E: 'static>(&self, get: fn(&E) -> Option<Uuid>) -> QueryResult<EntityPredicate<E>> {
        let value = self.value;

        match self.operator {
            Operator::Eq => Ok(boxed(move |e| Ok(get(e) == Some(value)))),
            Operator::Neq => Ok(boxed(move |e| Ok(get(e) != Some(value)))),
            op @ (Operator::In | Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte) => {
                Err(QueryError::InvalidOperatorForType {
                    op,
                    field_type: FieldType::Id,
                })
            }
        }
    }
}

/// A validated filter on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterDescriptor {
    String(StringFilter),
    Date(DateFilter),
    Id(IdFilter),
}

impl FilterDescriptor {
    /// Create a string filter
    pub fn string(value: impl Into<String>, operator: Operator) -> QueryResult<Self> {
        StringFilter::new(value, operator).map(FilterDescriptor::String)
    }

    /// Create a date filter
    pub fn date(value: NaiveDate, operator: Operator) -> QueryResult<Self> {
        DateFilter::new(value, operator).map(FilterDescriptor::Date)
    }

    /// Create an identifier filter
    pub fn id(value: Uuid, operator: Operator) -> QueryResult<Self> {
        IdFilter::new(value, operator).map(FilterDescriptor::Id)
    }

    /// Returns the value type this descriptor filters on
    pub fn field_type(&self) -> FieldType {
        match self {
            FilterDescriptor::String(_) => FieldType::String,
            FilterDescriptor::Date(_) => FieldType::Date,
            FilterDescriptor::Id(_) => FieldType::Id,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            FilterDescriptor::String(f) => f.operator(),
            FilterDescriptor::Date(f) => f.operator(),
            FilterDescriptor::Id(f) => f.operator(),
        }
    }

    /// Compile this descriptor against the accessor for `field`.
    ///
    /// Fails with `FieldTypeMismatch` if the accessor reads a different
    /// type than the descriptor holds.
    pub fn predicate<E: 'static>(
        &self,
        field: &str,
        accessor: FieldAccessor<E>,
    ) -> QueryResult<EntityPredicate<E>> {
        match (self, accessor) {
            (FilterDescriptor::String(f), FieldAccessor::Str(get)) => f.predicate(get),
            (FilterDescriptor::Date(f), FieldAccessor::Date(get)) => f.predicate(field, get),
            (FilterDescriptor::Id(f), FieldAccessor::Id(get)) => f.predicate(get),
            (descriptor, accessor) => Err(QueryError::FieldTypeMismatch {
                field: field.to_string(),
                expected: descriptor.field_type(),
                actual: accessor.field_type(),
            }),
        }
    }
}

impl From<StringFilter> for FilterDescriptor {
    fn from(f: StringFilter) -> Self {
        FilterDescriptor::String(f)
    }
}

impl From<DateFilter> for FilterDescriptor {
    fn from(f: DateFilter) -> Self {
        FilterDescriptor::Date(f)
    }
}

impl From<IdFilter> for FilterDescriptor {
    fn from(f: IdFilter) -> Self {
        FilterDescriptor::Id(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Guest {
        id: Uuid,
        name: Option<String>,
        arrival: Option<NaiveDate>,
    }

    fn guest_id(g: &Guest) -> Option<Uuid> {
        Some(g.id)
    }

    fn guest_name(g: &Guest) -> Option<&str> {
        g.name.as_deref()
    }

    fn guest_arrival(g: &Guest) -> Option<NaiveDate> {
        g.arrival
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn guest(name: Option<&str>, arrival: Option<NaiveDate>) -> Guest {
        Guest {
            id: Uuid::from_u128(7),
            name: name.map(String::from),
            arrival,
        }
    }

    fn eval<E: 'static>(p: &EntityPredicate<E>, e: &E) -> bool {
        p(e).unwrap()
    }

    #[test]
    fn test_string_filter_rejects_ordering() {
        for op in [Operator::Gt, Operator::Lt, Operator::Gte, Operator::Lte] {
            let err = StringFilter::new("x", op).unwrap_err();
            assert_eq!(
                err,
                QueryError::InvalidOperatorForType {
                    op,
                    field_type: FieldType::String
                }
            );
        }
    }

    #[test]
    fn test_date_filter_rejects_in() {
        assert!(DateFilter::new(date(2024, 6, 10), Operator::In).is_err());
        assert!(DateFilter::new(date(2024, 6, 10), Operator::Gte).is_ok());
    }

    #[test]
    fn test_id_filter_rejects_in_and_ordering() {
        for op in [Operator::In, Operator::Gt, Operator::Lt, Operator::Gte, Operator::Lte] {
            assert!(IdFilter::new(Uuid::nil(), op).is_err());
        }
        assert!(IdFilter::new(Uuid::nil(), Operator::Neq).is_ok());
    }

    #[test]
    fn test_string_eq_is_null_safe() {
        let f = FilterDescriptor::string("Alice", Operator::Eq).unwrap();
        let p = f.predicate("name", FieldAccessor::Str(guest_name)).unwrap();

        assert!(eval(&p, &guest(Some("Alice"), None)));
        assert!(!eval(&p, &guest(Some("alice"), None)));
        assert!(!eval(&p, &guest(None, None)));
    }

    #[test]
    fn test_string_neq_matches_absent() {
        let f = FilterDescriptor::string("Alice", Operator::Neq).unwrap();
        let p = f.predicate("name", FieldAccessor::Str(guest_name)).unwrap();

        assert!(!eval(&p, &guest(Some("Alice"), None)));
        assert!(eval(&p, &guest(Some("Bob"), None)));
        assert!(eval(&p, &guest(None, None)));
    }

    #[test]
    fn test_string_has_is_case_sensitive_containment() {
        let f = FilterDescriptor::string("li", Operator::In).unwrap();
        let p = f.predicate("name", FieldAccessor::Str(guest_name)).unwrap();

        assert!(eval(&p, &guest(Some("Alice"), None)));
        assert!(!eval(&p, &guest(Some("ALICE"), None)));
        assert!(!eval(&p, &guest(None, None)));
    }

    #[test]
    fn test_date_ordering() {
        let bound = date(2024, 6, 12);
        let before = guest(None, Some(date(2024, 6, 10)));
        let same = guest(None, Some(bound));
        let after = guest(None, Some(date(2024, 6, 15)));

        let check = |op: Operator| {
            let f = FilterDescriptor::date(bound, op).unwrap();
            let p = f.predicate("arrival", FieldAccessor::Date(guest_arrival)).unwrap();
            (eval(&p, &before), eval(&p, &same), eval(&p, &after))
        };

        assert_eq!(check(Operator::Gt), (false, false, true));
        assert_eq!(check(Operator::Gte), (false, true, true));
        assert_eq!(check(Operator::Lt), (true, false, false));
        assert_eq!(check(Operator::Lte), (true, true, false));
        assert_eq!(check(Operator::Eq), (false, true, false));
        assert_eq!(check(Operator::Neq), (true, false, true));
    }

    #[test]
    fn test_date_ordering_on_absent_value_fails() {
        let f = FilterDescriptor::date(date(2024, 6, 12), Operator::Gt).unwrap();
        let p = f.predicate("arrival", FieldAccessor::Date(guest_arrival)).unwrap();

        let err = p(&guest(None, None)).unwrap_err();
        assert_eq!(
            err,
            QueryError::MissingOrderedValue {
                field: "arrival".into()
            }
        );
    }

    #[test]
    fn test_date_eq_on_absent_value_is_false() {
        let f = FilterDescriptor::date(date(2024, 6, 12), Operator::Eq).unwrap();
        let p = f.predicate("arrival", FieldAccessor::Date(guest_arrival)).unwrap();

        assert!(!eval(&p, &guest(None, None)));
    }

    #[test]
    fn test_id_eq() {
        let f = FilterDescriptor::id(Uuid::from_u128(7), Operator::Eq).unwrap();
        let p = f.predicate("id", FieldAccessor::Id(guest_id)).unwrap();
        assert!(eval(&p, &guest(None, None)));

        let f = FilterDescriptor::id(Uuid::from_u128(8), Operator::Eq).unwrap();
        let p = f.predicate("id", FieldAccessor::Id(guest_id)).unwrap();
        assert!(!eval(&p, &guest(None, None)));
    }

    #[test]
    fn test_type_mismatch() {
        let f = FilterDescriptor::string("2024-06-10", Operator::Eq).unwrap();
        let err = f
            .predicate("arrival", FieldAccessor::Date(guest_arrival))
            .err()
            .unwrap();

        assert_eq!(
            err,
            QueryError::FieldTypeMismatch {
                field: "arrival".into(),
                expected: FieldType::String,
                actual: FieldType::Date,
            }
        );
    }

    #[test]
    fn test_descriptor_serializes_tagged() {
        let f = FilterDescriptor::date(date(2024, 6, 10), Operator::Lte).unwrap();
        let json = serde_json::to_value(&f).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "date", "value": "2024-06-10", "operator": "lte"})
        );
    }
}
