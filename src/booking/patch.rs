//! Partial booking updates
//!
//! Absent fields keep their current value. Dates are ISO-8601
//! (`YYYY-MM-DD`) on the wire.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{Booking, BookingStore};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{StoreResult, Validate};

/// Fields to overwrite on an existing booking
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookingPatch {
    pub hotel_name: Option<String>,
    pub guest_name: Option<String>,
    pub email: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

impl BookingPatch {
    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the patched booking and validates it.
    ///
    /// The original is left untouched; the id never changes.
    pub fn apply(&self, current: &Booking) -> StoreResult<Booking> {
        let patched = Booking {
            id: current.id,
            hotel_name: self
                .hotel_name
                .clone()
                .unwrap_or_else(|| current.hotel_name.clone()),
            guest_name: self
                .guest_name
                .clone()
                .unwrap_or_else(|| current.guest_name.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            check_in: self.check_in.unwrap_or(current.check_in),
            check_out: self.check_out.unwrap_or(current.check_out),
        };

        patched.validate()?;
        Ok(patched)
    }

    /// Names of the fields this patch sets, in wire form
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.hotel_name.is_some() {
            fields.push("hotelName");
        }
        if self.guest_name.is_some() {
            fields.push("guestName");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.check_in.is_some() {
            fields.push("checkIn");
        }
        if self.check_out.is_some() {
            fields.push("checkOut");
        }
        fields
    }
}

impl BookingStore {
    /// Applies a partial update. Returns false if the id is unknown.
    pub fn patch(&self, id: Uuid, patch: &BookingPatch) -> StoreResult<bool> {
        let patched = self.modify(id, |current| patch.apply(current))?;
        if patched {
            log_event_with_fields(
                Event::BookingPatched,
                &[
                    ("fields", &patch.changed_fields().join(",")),
                    ("id", &id.to_string()),
                ],
            );
        }
        Ok(patched)
    }
}
