//! Predicate and comparator compilation
//!
//! Descriptors and sort specs are resolved against the entity schema up
//! front. Unknown fields fail here, before any entity is touched.

use std::cmp::Ordering;

use super::errors::{QueryError, QueryResult};
use super::filter::{boxed, EntityPredicate};
use super::model::{QueryDescriptor, SortField, SortSpec};
use crate::schema::{Entity, FieldAccessor, FieldType};

/// Compiled total order over two entities
pub type EntityComparator<E> = Box<dyn Fn(&E, &E) -> Ordering>;

fn comparator<E>(f: impl Fn(&E, &E) -> Ordering + 'static) -> EntityComparator<E> {
    Box::new(f)
}

/// Compiles a descriptor into one conjunctive predicate.
///
/// Per-field predicates run in descriptor order and stop at the first
/// false. An empty descriptor accepts everything.
pub fn compile_predicate<E: Entity>(query: &QueryDescriptor) -> QueryResult<EntityPredicate<E>> {
    let schema = E::schema();

    let predicates = query
        .iter()
        .map(|(field, descriptor)| {
            let def = schema
                .field(field)
                .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

            let field_type = def.field_type();
            if !field_type.is_supported() {
                return Err(QueryError::UnsupportedFieldType {
                    field: field.to_string(),
                    field_type,
                });
            }

            descriptor.predicate(field, def.accessor)
        })
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(boxed(move |entity| {
        for predicate in &predicates {
            if !predicate(entity)? {
                return Ok(false);
            }
        }
        Ok(true)
    }))
}

/// Compiles a sort spec into a comparator.
///
/// The first field is primary; each later field only breaks ties. Zero
/// fields compare everything equal.
pub fn compile_comparator<E: Entity>(sort: &SortSpec) -> QueryResult<EntityComparator<E>> {
    let keys = sort
        .fields()
        .iter()
        .map(field_comparator::<E>)
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(comparator(move |a, b| {
        keys.iter()
            .fold(Ordering::Equal, |ord, key| ord.then_with(|| key(a, b)))
    }))
}

fn field_comparator<E: Entity>(sort: &SortField) -> QueryResult<EntityComparator<E>> {
    let def = E::schema()
        .field(&sort.field)
        .ok_or_else(|| QueryError::UnknownSortField(sort.field.clone()))?;
    let ascending = sort.ascending;

    match def.accessor {
        FieldAccessor::Str(get) => Ok(comparator(move |a, b| {
            nulls_last(get(a), get(b), ascending)
        })),
        FieldAccessor::Date(get) => Ok(comparator(move |a, b| {
            nulls_last(get(a), get(b), ascending)
        })),
        FieldAccessor::Id(get) => Ok(comparator(move |a, b| {
            nulls_last(get(a), get(b), ascending)
        })),
        FieldAccessor::Opaque(field_type) => Err(QueryError::UnsupportedFieldType {
            field: sort.field.clone(),
            field_type: FieldType::Unsupported(field_type),
        }),
    }
}

/// Absent values go after present ones whatever the direction
fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if ascending => a.cmp(&b),
        (Some(a), Some(b)) => b.cmp(&a),
    }
}
