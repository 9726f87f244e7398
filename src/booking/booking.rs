//! Booking record and its schema table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{Entity, EntitySchema, FieldDef};
use crate::store::{StoreError, StoreResult, Validate};

/// A hotel booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub hotel_name: String,
    pub guest_name: String,
    pub email: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Booking {
    pub fn new(
        id: Uuid,
        hotel_name: impl Into<String>,
        guest_name: impl Into<String>,
        email: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Self {
        Self {
            id,
            hotel_name: hotel_name.into(),
            guest_name: guest_name.into(),
            email: email.into(),
            check_in,
            check_out,
        }
    }
}

impl Validate for Booking {
    fn validate(&self) -> StoreResult<()> {
        if self.hotel_name.trim().is_empty() {
            return Err(StoreError::validation("hotelName is required"));
        }
        if self.guest_name.trim().is_empty() {
            return Err(StoreError::validation("guestName is required"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(StoreError::validation("A valid email is required"));
        }
        if self.check_in > self.check_out {
            return Err(StoreError::validation("checkIn cannot be after checkOut"));
        }
        Ok(())
    }
}

fn booking_id(b: &Booking) -> Option<Uuid> {
    Some(b.id)
}

fn hotel_name(b: &Booking) -> Option<&str> {
    Some(&b.hotel_name)
}

fn guest_name(b: &Booking) -> Option<&str> {
    Some(&b.guest_name)
}

fn email(b: &Booking) -> Option<&str> {
    Some(&b.email)
}

fn check_in(b: &Booking) -> Option<NaiveDate> {
    Some(b.check_in)
}

fn check_out(b: &Booking) -> Option<NaiveDate> {
    Some(b.check_out)
}

static BOOKING_FIELDS: &[FieldDef<Booking>] = &[
    FieldDef::id("id", booking_id),
    FieldDef::string("hotelName", hotel_name),
    FieldDef::string("guestName", guest_name),
    FieldDef::string("email", email),
    FieldDef::date("checkIn", check_in),
    FieldDef::date("checkOut", check_out),
];

static BOOKING_SCHEMA: EntitySchema<Booking> = EntitySchema::new("booking", BOOKING_FIELDS);

impl Entity for Booking {
    fn schema() -> &'static EntitySchema<Self> {
        &BOOKING_SCHEMA
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
