//! # Filter and Sort Expression Parser
//!
//! Filter grammar (one or more conditions joined by `AND`):
//!
//! ```text
//! filter    := condition ( WS "AND" WS condition )*
//! condition := FIELD WS OPERATOR WS "'" VALUE "'"
//! FIELD     := [A-Za-z0-9_]+
//! OPERATOR  := eq | neq | has | gt | lt | gte | lte     (case-insensitive)
//! VALUE     := any characters, a literal quote written as ''
//! ```
//!
//! Sort grammar: `FIELD [WS DIRECTION] ( "," FIELD [WS DIRECTION] )*`,
//! where only `DESC` (case-insensitive) selects descending order.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use uuid::Uuid;

use super::errors::{QueryError, QueryResult};
use super::filter::FilterDescriptor;
use super::model::{QueryDescriptor, SortField, SortSpec};
use super::operator::Operator;
use crate::schema::{Entity, FieldType};

/// Policy knobs for input that the grammar does not cover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject conditions that do not match the grammar instead of skipping them
    pub strict_conditions: bool,
    /// Accept only `ASC`/`DESC` as sort direction instead of treating
    /// anything but `DESC` as ascending
    pub strict_sort_direction: bool,
}

impl ParseOptions {
    /// Both strict policies enabled
    pub fn strict() -> Self {
        Self {
            strict_conditions: true,
            strict_sort_direction: true,
        }
    }
}

fn condition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^([A-Za-z0-9_]+)\s+(eq|neq|has|gt|lt|gte|lte)\s+'((?:[^']|'')*)'$")
            .expect("condition pattern is a valid regex")
    })
}

fn and_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\s+AND\s+").expect("separator is a valid regex"))
}

/// Parse filter text against the schema of `E` with default (lenient) options.
///
/// `None` or blank text yields `Ok(None)`: no filtering requested.
pub fn parse_filter<E: Entity>(text: Option<&str>) -> QueryResult<Option<QueryDescriptor>> {
    parse_filter_with::<E>(text, ParseOptions::default())
}

/// Parse filter text against the schema of `E`.
///
/// All-or-nothing: the first field, operator or literal error aborts
/// the whole parse.
pub fn parse_filter_with<E: Entity>(
    text: Option<&str>,
    options: ParseOptions,
) -> QueryResult<Option<QueryDescriptor>> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Ok(None),
    };

    let mut query = QueryDescriptor::new();

    for condition in split_conditions(text) {
        let condition = condition.trim();

        let captures = match condition_pattern().captures(condition) {
            Some(c) => c,
            None if options.strict_conditions => {
                return Err(QueryError::MalformedCondition(condition.to_string()))
            }
            None => continue,
        };

        let field = &captures[1];
        let operator = &captures[2];
        let raw_value = captures[3].replace("''", "'");

        let filter = parse_condition::<E>(field, operator, raw_value)?;
        query.insert(field, filter);
    }

    Ok(Some(query))
}

/// Splits on `AND` separators that are outside quoted literals.
///
/// A separator is outside quotes when an even number of `'` precede it;
/// the `''` escape keeps that parity. A segment left with an odd number
/// of quotes holds a stray `'`, so it is split on every separator instead
/// and only the broken condition is lost.
fn split_conditions(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for sep in and_separator().find_iter(text) {
        if quote_count(&text[..sep.start()]) % 2 == 0 {
            parts.push(&text[start..sep.start()]);
            start = sep.end();
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .flat_map(|part| {
            if quote_count(part) % 2 == 0 {
                vec![part]
            } else {
                and_separator().split(part).collect()
            }
        })
        .collect()
}

fn quote_count(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\'').count()
}

fn parse_condition<E: Entity>(
    field: &str,
    operator: &str,
    raw_value: String,
) -> QueryResult<FilterDescriptor> {
    let field_type = E::schema()
        .field_type(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

    let operator = Operator::parse(operator)?;

    match field_type {
        FieldType::String => FilterDescriptor::string(raw_value, operator),
        FieldType::Date => FilterDescriptor::date(parse_date(field, &raw_value)?, operator),
        FieldType::Id => FilterDescriptor::id(parse_id(field, &raw_value)?, operator),
        FieldType::Unsupported(_) => Err(QueryError::UnsupportedFieldType {
            field: field.to_string(),
            field_type,
        }),
    }
}

/// Strict ISO calendar date: exactly `YYYY-MM-DD`
fn parse_date(field: &str, raw: &str) -> QueryResult<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    shaped
        .then(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| malformed(field, FieldType::Date, raw))
}

/// Strict hyphenated UUID: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
fn parse_id(field: &str, raw: &str) -> QueryResult<Uuid> {
    if raw.len() != 36 {
        return Err(malformed(field, FieldType::Id, raw));
    }
    Uuid::parse_str(raw).map_err(|_| malformed(field, FieldType::Id, raw))
}

fn malformed(field: &str, field_type: FieldType, raw: &str) -> QueryError {
    QueryError::MalformedLiteral {
        field: field.to_string(),
        field_type,
        value: raw.to_string(),
    }
}

/// Parse sort text with default (lenient) options.
///
/// `None` or blank text yields `Ok(None)`: no ordering requested.
pub fn parse_sort(text: Option<&str>) -> QueryResult<Option<SortSpec>> {
    parse_sort_with(text, ParseOptions::default())
}

/// Parse comma-separated sort text.
///
/// Field names are not resolved here; unknown names surface when the
/// comparator is compiled.
pub fn parse_sort_with(text: Option<&str>, options: ParseOptions) -> QueryResult<Option<SortSpec>> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Ok(None),
    };

    let mut fields = Vec::new();

    for part in text.split(',') {
        let tokens: Vec<&str> = part.split_whitespace().collect();

        let field = match tokens.first() {
            Some(f) => *f,
            None => continue,
        };

        let ascending = if options.strict_sort_direction {
            match tokens.as_slice() {
                [_] => true,
                [_, dir] if dir.eq_ignore_ascii_case("asc") => true,
                [_, dir] if dir.eq_ignore_ascii_case("desc") => false,
                [_, dir] => return Err(QueryError::InvalidSortDirection(dir.to_string())),
                _ => return Err(QueryError::InvalidSortDirection(part.trim().to_string())),
            }
        } else {
            !(tokens.len() == 2 && tokens[1].eq_ignore_ascii_case("desc"))
        };

        fields.push(SortField {
            field: field.to_string(),
            ascending,
        });
    }

    if fields.is_empty() {
        return Ok(None);
    }

    Ok(Some(SortSpec::new(fields)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Booking;

    fn filter(text: &str) -> QueryResult<Option<QueryDescriptor>> {
        parse_filter::<Booking>(Some(text))
    }

    #[test]
    fn test_single_condition() {
        let query = filter("hotelName eq 'Hilton'").unwrap().unwrap();

        assert_eq!(query.len(), 1);
        assert_eq!(
            query.get("hotelName"),
            Some(&FilterDescriptor::string("Hilton", Operator::Eq).unwrap())
        );
    }

    #[test]
    fn test_absent_or_blank_filter() {
        assert_eq!(parse_filter::<Booking>(None).unwrap(), None);
        assert_eq!(parse_filter::<Booking>(Some("")).unwrap(), None);
        assert_eq!(parse_filter::<Booking>(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_conjunction_case_insensitive_and() {
        let query = filter("guestName eq 'John' and hotelName EQ 'Hilton' AnD checkIn gte '2024-06-01'")
            .unwrap()
            .unwrap();

        assert_eq!(query.len(), 3);
        assert_eq!(query.get("checkIn").unwrap().operator(), Operator::Gte);
        assert!(matches!(query.get("checkIn"), Some(FilterDescriptor::Date(_))));
    }

    #[test]
    fn test_escaped_quote() {
        let query = filter("guestName eq 'O''Brien'").unwrap().unwrap();

        match query.get("guestName") {
            Some(FilterDescriptor::String(f)) => assert_eq!(f.value(), "O'Brien"),
            other => panic!("unexpected filter: {:?}", other),
        }
    }

    #[test]
    fn test_and_inside_literal_is_not_a_separator() {
        let query = filter("hotelName eq 'Bed and Breakfast' and guestName has 'o'")
            .unwrap()
            .unwrap();

        assert_eq!(query.len(), 2);
        match query.get("hotelName") {
            Some(FilterDescriptor::String(f)) => assert_eq!(f.value(), "Bed and Breakfast"),
            other => panic!("unexpected filter: {:?}", other),
        }
    }

    #[test]
    fn test_stray_quote_only_drops_its_condition() {
        let text = "guestName eq 'O'Brien' and hotelName eq 'Hilton'";

        let query = filter(text).unwrap().unwrap();
        assert_eq!(query.len(), 1);
        assert_eq!(
            query.get("hotelName"),
            Some(&FilterDescriptor::string("Hilton", Operator::Eq).unwrap())
        );

        let strict = ParseOptions {
            strict_conditions: true,
            ..ParseOptions::default()
        };
        assert_eq!(
            parse_filter_with::<Booking>(Some(text), strict).unwrap_err(),
            QueryError::MalformedCondition("guestName eq 'O'Brien'".into())
        );
    }

    #[test]
    fn test_repeated_field_last_one_wins() {
        let query = filter("hotelName eq 'Hilton' and hotelName neq 'Marriott'")
            .unwrap()
            .unwrap();

        assert_eq!(query.len(), 1);
        assert_eq!(
            query.get("hotelName"),
            Some(&FilterDescriptor::string("Marriott", Operator::Neq).unwrap())
        );
    }

    #[test]
    fn test_malformed_condition_skipped_by_default() {
        let query = filter("hotelName eq Hilton and guestName eq 'Bob'")
            .unwrap()
            .unwrap();

        assert_eq!(query.len(), 1);
        assert!(query.get("guestName").is_some());
    }

    #[test]
    fn test_all_conditions_malformed_yields_empty_descriptor() {
        let query = filter("nonsense").unwrap().unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_malformed_condition_rejected_in_strict_mode() {
        let err = parse_filter_with::<Booking>(
            Some("hotelName eq Hilton and guestName eq 'Bob'"),
            ParseOptions::strict(),
        )
        .unwrap_err();

        assert_eq!(err, QueryError::MalformedCondition("hotelName eq Hilton".into()));
    }

    #[test]
    fn test_unknown_field() {
        let err = filter("unknownField eq 'x'").unwrap_err();
        assert_eq!(err, QueryError::UnknownField("unknownField".into()));
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        assert!(matches!(filter("HotelName eq 'x'"), Err(QueryError::UnknownField(_))));
    }

    #[test]
    fn test_invalid_operator_for_type() {
        let err = filter("hotelName gt 'H'").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidOperatorForType {
                op: Operator::Gt,
                field_type: FieldType::String
            }
        );

        assert!(matches!(
            filter("checkIn has '2024-06-10'"),
            Err(QueryError::InvalidOperatorForType { .. })
        ));
        assert!(matches!(
            filter("id lt '00000000-0000-0000-0000-000000000001'"),
            Err(QueryError::InvalidOperatorForType { .. })
        ));
    }

    #[test]
    fn test_error_aborts_whole_parse() {
        let result = filter("hotelName eq 'Hilton' and nope eq 'x'");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_date() {
        for raw in [
            "2024-13-01",
            "2024-6-1",
            "10/06/2024",
            "2024-02-30",
            "",
            "2024- 6-10",
            "2024-06- 1",
            "+024-06-10",
        ] {
            let err = filter(&format!("checkIn eq '{}'", raw)).unwrap_err();
            assert!(
                matches!(err, QueryError::MalformedLiteral { field_type: FieldType::Date, .. }),
                "{} should be malformed",
                raw
            );
        }
    }

    #[test]
    fn test_id_literal() {
        let query = filter("id eq '00000000-0000-0000-0000-000000000002'")
            .unwrap()
            .unwrap();
        assert_eq!(
            query.get("id"),
            Some(&FilterDescriptor::id(Uuid::from_u128(2), Operator::Eq).unwrap())
        );

        let err = filter("id eq '00000000000000000000000000000002'").unwrap_err();
        assert!(matches!(err, QueryError::MalformedLiteral { field_type: FieldType::Id, .. }));
    }

    #[test]
    fn test_parse_sort() {
        let spec = parse_sort(Some("checkIn DESC, hotelName")).unwrap().unwrap();

        assert_eq!(
            spec.fields(),
            &[SortField::desc("checkIn"), SortField::asc("hotelName")]
        );
    }

    #[test]
    fn test_parse_sort_absent_or_blank() {
        assert_eq!(parse_sort(None).unwrap(), None);
        assert_eq!(parse_sort(Some("  ")).unwrap(), None);
        assert_eq!(parse_sort(Some(" , ")).unwrap(), None);
    }

    #[test]
    fn test_parse_sort_direction_quirk() {
        let spec = parse_sort(Some("checkIn desc, checkOut DESCENDING, guestName asc"))
            .unwrap()
            .unwrap();

        assert!(!spec.fields()[0].ascending);
        assert!(spec.fields()[1].ascending);
        assert!(spec.fields()[2].ascending);
    }

    #[test]
    fn test_parse_sort_strict_direction() {
        let strict = ParseOptions::strict();

        let spec = parse_sort_with(Some("checkIn desc, hotelName ASC"), strict)
            .unwrap()
            .unwrap();
        assert_eq!(
            spec.fields(),
            &[SortField::desc("checkIn"), SortField::asc("hotelName")]
        );

        let err = parse_sort_with(Some("checkIn DESCENDING"), strict).unwrap_err();
        assert_eq!(err, QueryError::InvalidSortDirection("DESCENDING".into()));

        assert!(parse_sort_with(Some("checkIn desc extra"), strict).is_err());
    }
}
