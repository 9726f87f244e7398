//! Store subsystem for bookingdb
//!
//! A keyed in-memory map of entities. Mutation goes through a write
//! lock; queries take a read lock and hand the stored records to the
//! stateless query executor, so a query never sees a half-applied write.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;

/// Record-level rules checked before every write
pub trait Validate {
    fn validate(&self) -> StoreResult<()>;
}
