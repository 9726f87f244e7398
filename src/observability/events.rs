//! Observable events for bookingdb
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Data file read into the store
    DataLoaded,

    // Query
    /// Filter and sort text accepted for processing
    QueryReceived,
    /// Query ran to completion
    QueryExecuted,
    /// Query failed to parse or compile
    QueryRejected,

    // Store
    /// Record inserted
    RecordAdded,
    /// Record replaced or modified
    RecordUpdated,
    /// Record removed
    RecordDeleted,
    /// Partial booking update applied
    BookingPatched,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataLoaded => "DATA_LOADED",
            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::RecordAdded => "RECORD_ADDED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::BookingPatched => "BOOKING_PATCHED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected => Severity::Warn,
            Event::QueryReceived => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::DataLoaded,
            Event::QueryReceived,
            Event::QueryExecuted,
            Event::QueryRejected,
            Event::RecordAdded,
            Event::RecordUpdated,
            Event::RecordDeleted,
            Event::BookingPatched,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_are_warnings() {
        assert_eq!(Event::QueryRejected.severity(), Severity::Warn);
        assert_eq!(Event::QueryExecuted.severity(), Severity::Info);
        assert_eq!(format!("{}", Event::BookingPatched), "BOOKING_PATCHED");
    }
}
