//! Query execution
//!
//! Stateless: every call compiles its own predicate and comparator, reads
//! the input once and returns owned copies of the matches.

use super::compiler::{compile_comparator, compile_predicate};
use super::errors::QueryResult;
use super::model::{QueryDescriptor, SortSpec};
use crate::schema::Entity;

/// Filters and sorts `items` without touching them.
///
/// - No filter keeps every item.
/// - No sort, or an empty one, keeps input order.
/// - Sorting is stable, so equal keys keep their relative input order.
///
/// Compilation errors surface before any item is read.
pub fn execute_query<'a, E>(
    items: impl IntoIterator<Item = &'a E>,
    filter: Option<&QueryDescriptor>,
    sort: Option<&SortSpec>,
) -> QueryResult<Vec<E>>
where
    E: Entity + Clone + 'a,
{
    let predicate = filter.map(compile_predicate::<E>).transpose()?;
    let comparator = sort
        .filter(|spec| !spec.is_empty())
        .map(compile_comparator::<E>)
        .transpose()?;

    let mut matched = Vec::new();
    for item in items {
        let keep = match &predicate {
            Some(predicate) => predicate(item)?,
            None => true,
        };
        if keep {
            matched.push(item.clone());
        }
    }

    if let Some(comparator) = comparator {
        matched.sort_by(|a, b| comparator(a, b));
    }

    Ok(matched)
}
