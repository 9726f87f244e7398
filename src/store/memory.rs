//! In-memory entity store
//!
//! Records are keyed by id in a `BTreeMap`, so the natural iteration
//! order (and therefore unsorted query output) is ascending id order.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::Validate;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{execute_query, QueryDescriptor, SortSpec};
use crate::schema::Entity;

/// Keyed in-memory store
#[derive(Debug)]
pub struct InMemoryStore<E> {
    records: RwLock<BTreeMap<Uuid, E>>,
}

impl<E> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity + Validate + Clone> InMemoryStore<E> {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from existing records.
    ///
    /// Every record is validated; a repeated id is rejected.
    pub fn from_records(records: impl IntoIterator<Item = E>) -> StoreResult<Self> {
        let mut map = BTreeMap::new();
        for record in records {
            record.validate()?;
            let id = record.id();
            if map.insert(id, record).is_some() {
                return Err(StoreError::DuplicateId(id));
            }
        }
        Ok(Self {
            records: RwLock::new(map),
        })
    }

    /// Generates a fresh random id
    pub fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    /// Adds a new record
    pub fn add(&self, record: E) -> StoreResult<()> {
        record.validate()?;
        let id = record.id();

        let mut records = self.write()?;
        if records.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        records.insert(id, record);
        drop(records);

        log_event_with_fields(
            Event::RecordAdded,
            &[("entity", E::schema().name()), ("id", &id.to_string())],
        );
        Ok(())
    }

    pub fn get_by_id(&self, id: Uuid) -> StoreResult<Option<E>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Replaces an existing record. Returns false if the id is unknown.
    pub fn update(&self, record: E) -> StoreResult<bool> {
        record.validate()?;
        let id = record.id();

        let mut records = self.write()?;
        let updated = match records.get_mut(&id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        };
        drop(records);

        if updated {
            log_event_with_fields(
                Event::RecordUpdated,
                &[("entity", E::schema().name()), ("id", &id.to_string())],
            );
        }
        Ok(updated)
    }

    /// Rewrites a record in place from its current value.
    ///
    /// The closure's result must keep the id and pass validation.
    /// Returns false if the id is unknown.
    pub fn modify(&self, id: Uuid, change: impl FnOnce(&E) -> StoreResult<E>) -> StoreResult<bool> {
        let mut records = self.write()?;
        let existing = match records.get_mut(&id) {
            Some(e) => e,
            None => return Ok(false),
        };

        let changed = change(existing)?;
        if changed.id() != id {
            return Err(StoreError::validation("id cannot be changed"));
        }
        changed.validate()?;
        *existing = changed;
        drop(records);

        log_event_with_fields(
            Event::RecordUpdated,
            &[("entity", E::schema().name()), ("id", &id.to_string())],
        );
        Ok(true)
    }

    /// Removes a record. Returns false if the id is unknown.
    pub fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let removed = self.write()?.remove(&id).is_some();
        if removed {
            log_event_with_fields(
                Event::RecordDeleted,
                &[("entity", E::schema().name()), ("id", &id.to_string())],
            );
        }
        Ok(removed)
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Copies all records in id order
    pub fn snapshot(&self) -> StoreResult<Vec<E>> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Filters and sorts a read-consistent view of the store.
    ///
    /// The store itself is never reordered or mutated.
    pub fn query(
        &self,
        filter: Option<&QueryDescriptor>,
        sort: Option<&SortSpec>,
    ) -> StoreResult<Vec<E>> {
        let records = self.read()?;
        let scanned = records.len();
        let result = execute_query(records.values(), filter, sort)?;
        drop(records);

        log_event_with_fields(
            Event::QueryExecuted,
            &[
                ("entity", E::schema().name()),
                ("returned", &result.len().to_string()),
                ("scanned", &scanned.to_string()),
            ],
        );
        Ok(result)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<Uuid, E>>> {
        self.records.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<Uuid, E>>> {
        self.records.write().map_err(|_| StoreError::Poisoned)
    }
}
