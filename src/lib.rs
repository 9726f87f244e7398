//! bookingdb - filter and sort hotel bookings with a small expression language
//!
//! - `query`: operators, filter descriptors, parser, compiler, executor
//! - `schema`: static per-entity field tables
//! - `booking`: the booking entity and its store
//! - `store`: keyed in-memory store
//! - `observability`: structured JSON logging
//! - `cli`: config file and command-line entry point

pub mod booking;
pub mod cli;
pub mod observability;
pub mod query;
pub mod schema;
pub mod store;
