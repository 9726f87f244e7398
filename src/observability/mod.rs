//! Observability subsystem for bookingdb
//!
//! Structured JSON logging of typed events. Logging is read-only: it never
//! changes the outcome of the operation being logged, and a failed write
//! is dropped.
//!
//! # Usage
//!
//! ```ignore
//! use bookingdb::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::log(Severity::Info, "QUERY_EXECUTED", &[("returned", "2")]);
//! log_event_with_fields(Event::QueryRejected, &[("code", "BOOKING_QUERY_UNKNOWN_FIELD")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
