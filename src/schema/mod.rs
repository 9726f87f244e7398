//! Schema subsystem for bookingdb
//!
//! Every queryable entity kind publishes a static table mapping field
//! names to a declared type and a typed accessor. The query parser uses
//! the type to interpret literals; the compiler uses the accessor to read
//! values. No runtime reflection is involved.

mod types;

pub use types::{Entity, EntitySchema, FieldAccessor, FieldDef, FieldType};
