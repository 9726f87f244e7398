//! Query subsystem for bookingdb
//!
//! Turns a filter expression and a sort expression into typed
//! descriptors, compiles them against an entity schema and runs them over
//! an in-memory collection.
//!
//! # Execution Flow (strict order)
//!
//! 1. Parse the filter text into a `QueryDescriptor` (field → filter)
//! 2. Parse the sort text into a `SortSpec`
//! 3. Compile both against the entity schema, failing on unknown fields
//! 4. Keep the entities every per-field predicate accepts
//! 5. Stable-sort the matches by the compiled comparator
//!
//! Nothing here logs or holds state between calls.

mod compiler;
mod errors;
mod executor;
mod filter;
mod model;
mod operator;
mod parser;

pub use compiler::{compile_comparator, compile_predicate, EntityComparator};
pub use errors::{ErrorCategory, QueryError, QueryResult};
pub use executor::execute_query;
pub use filter::{DateFilter, EntityPredicate, FilterDescriptor, IdFilter, StringFilter};
pub use model::{QueryDescriptor, SortField, SortSpec};
pub use operator::Operator;
pub use parser::{parse_filter, parse_filter_with, parse_sort, parse_sort_with, ParseOptions};
