//! CLI command implementations
//!
//! Every command loads the config first and applies its log level. Only
//! `query` and `check` read the data file.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};
use crate::booking::{Booking, BookingStore};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::query::{
    parse_filter_with, parse_sort_with, QueryDescriptor, QueryError, QueryResult, SortSpec,
};
use crate::store::StoreError;

/// Run a command and write its response to stdout.
///
/// Errors are written as an error response and also returned, so the
/// caller can exit non-zero.
pub fn run_command(command: &Command) -> CliResult<()> {
    match execute(command) {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(&err)?;
            Err(err)
        }
    }
}

/// Run a command and return the `data` payload of its response
pub fn execute(command: &Command) -> CliResult<Value> {
    match command {
        Command::Query {
            config,
            filter,
            sort,
        } => query(config, filter.as_deref(), sort.as_deref()),
        Command::Explain {
            config,
            filter,
            sort,
        } => explain(config, filter.as_deref(), sort.as_deref()),
        Command::Check { config } => check(config),
    }
}

/// Filter and sort the stored bookings
pub fn query(config_path: &Path, filter: Option<&str>, sort: Option<&str>) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let store = load_store(&config)?;

    let (descriptor, spec) = parse_request(&config, filter, sort)?;
    let bookings = store
        .query(descriptor.as_ref(), spec.as_ref())
        .map_err(|err| match err {
            StoreError::Query(err) => rejected(err),
            other => CliError::from(other),
        })?;

    Ok(serde_json::to_value(bookings)?)
}

/// Show how a filter and sort parse, without reading data
pub fn explain(config_path: &Path, filter: Option<&str>, sort: Option<&str>) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let (descriptor, spec) = parse_request(&config, filter, sort)?;

    Ok(serde_json::to_value(Explanation {
        filter: descriptor,
        sort: spec,
    })?)
}

/// Payload of `explain`
#[derive(Debug, Serialize)]
struct Explanation {
    filter: Option<QueryDescriptor>,
    sort: Option<SortSpec>,
}

/// Validate config and data file, reporting the record count
pub fn check(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let store = load_store(&config)?;

    Ok(json!({
        "bookings": store.len()?,
        "data_file": config.data_file.display().to_string(),
    }))
}

fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    Logger::set_min_severity(config.severity()?);

    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", &path.display().to_string())],
    );
    Ok(config)
}

fn load_store(config: &Config) -> CliResult<BookingStore> {
    let store = config.load_store()?;

    log_event_with_fields(
        Event::DataLoaded,
        &[
            ("path", &config.data_file.display().to_string()),
            ("records", &store.len()?.to_string()),
        ],
    );
    Ok(store)
}

fn parse_request(
    config: &Config,
    filter: Option<&str>,
    sort: Option<&str>,
) -> CliResult<(Option<QueryDescriptor>, Option<SortSpec>)> {
    log_event_with_fields(
        Event::QueryReceived,
        &[
            ("filter", filter.unwrap_or("")),
            ("sort", sort.unwrap_or("")),
        ],
    );

    let options = config.parse_options();
    let parsed: QueryResult<_> = parse_filter_with::<Booking>(filter, options)
        .and_then(|descriptor| Ok((descriptor, parse_sort_with(sort, options)?)));

    parsed.map_err(rejected)
}

/// Logs a query the engine refused, whether at parse, compile or run time
fn rejected(err: QueryError) -> CliError {
    log_event_with_fields(
        Event::QueryRejected,
        &[("code", err.code()), ("message", &err.to_string())],
    );
    CliError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const BOOKINGS: &str = r#"[
        {"id": "00000000-0000-0000-0000-000000000001", "hotelName": "Hilton", "guestName": "Alice",
         "email": "alice@example.com", "checkIn": "2024-06-10", "checkOut": "2024-06-15"},
        {"id": "00000000-0000-0000-0000-000000000002", "hotelName": "Marriott", "guestName": "Bob",
         "email": "bob@example.com", "checkIn": "2024-06-12", "checkOut": "2024-06-18"}
    ]"#;

    fn setup(config: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bookings.json"), BOOKINGS).unwrap();
        let path = dir.path().join("bookingdb.json");
        fs::write(&path, config).unwrap();
        (dir, path)
    }

    #[test]
    fn test_query_command() {
        let (_dir, path) = setup(r#"{"data_file": "bookings.json", "log_level": "fatal"}"#);

        let data = query(&path, Some("guestName has 'Bob'"), None).unwrap();

        assert_eq!(data.as_array().unwrap().len(), 1);
        assert_eq!(data[0]["guestName"], "Bob");
    }

    #[test]
    fn test_explain_command() {
        let (_dir, path) = setup(r#"{"data_file": "missing.json", "log_level": "fatal"}"#);

        let data = explain(&path, Some("checkIn gte '2024-06-01'"), Some("checkIn DESC")).unwrap();

        assert_eq!(data["filter"]["checkIn"]["type"], "date");
        assert_eq!(data["filter"]["checkIn"]["operator"], "gte");
        assert_eq!(data["sort"][0]["field"], "checkIn");
        assert_eq!(data["sort"][0]["ascending"], false);
    }

    #[test]
    fn test_explain_without_expressions() {
        let (_dir, path) = setup(r#"{"data_file": "bookings.json", "log_level": "fatal"}"#);

        let data = explain(&path, None, None).unwrap();
        assert_eq!(data, json!({"filter": null, "sort": null}));
    }

    #[test]
    fn test_check_command() {
        let (_dir, path) = setup(r#"{"data_file": "bookings.json", "log_level": "fatal"}"#);

        let data = check(&path).unwrap();
        assert_eq!(data["bookings"], 2);
    }

    #[test]
    fn test_strict_config_rejects_bad_direction() {
        let (_dir, path) = setup(
            r#"{"data_file": "bookings.json", "log_level": "fatal", "strict_sort_direction": true}"#,
        );

        let err = query(&path, None, Some("checkIn sideways")).unwrap_err();
        assert_eq!(err.code(), "BOOKING_QUERY_INVALID_SORT_DIRECTION");
    }

    #[test]
    fn test_unknown_field_code() {
        let (_dir, path) = setup(r#"{"data_file": "bookings.json", "log_level": "fatal"}"#);

        let err = execute(&Command::Query {
            config: path,
            filter: Some("rating eq '5'".into()),
            sort: None,
        })
        .unwrap_err();

        assert_eq!(err.code(), "BOOKING_QUERY_UNKNOWN_FIELD");
    }

    #[test]
    fn test_execution_errors_are_rejections() {
        let (_dir, path) = setup(r#"{"data_file": "bookings.json", "log_level": "fatal"}"#);

        let err = query(&path, None, Some("rating")).unwrap_err();
        assert!(matches!(
            err,
            CliError::Query(QueryError::UnknownSortField(ref field)) if field == "rating"
        ));
        assert_eq!(err.code(), "BOOKING_QUERY_UNKNOWN_SORT_FIELD");
    }
}
