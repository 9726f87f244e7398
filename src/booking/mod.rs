//! Booking entity for bookingdb
//!
//! The one entity kind the service stores. Its schema table exposes
//! `id`, `hotelName`, `guestName`, `email`, `checkIn` and `checkOut` to
//! the query engine under the same names it uses on the wire.

mod booking;
mod patch;

pub use booking::Booking;
pub use patch::BookingPatch;

use crate::store::InMemoryStore;

/// In-memory store of bookings
pub type BookingStore = InMemoryStore<Booking>;
