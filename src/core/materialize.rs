//! Row materialization - result rows into domain objects

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::{Type, Value, ValueRef};
use rusqlite::{params_from_iter, Row, Statement};

use crate::core::error::RepoError;
use crate::core::resource::Resource;

/// Offset-less layouts SQLite and common drivers write; read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Layouts carrying an explicit offset that are not strict RFC 3339
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// SQLite `date()` output; read as midnight UTC
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Run a prepared statement and materialize every row
///
/// "Now" is sampled once for the whole batch. The first row that fails to
/// scan aborts the call; rows read before it are dropped. Errors raised by
/// the store while stepping are query errors, not row errors.
pub fn materialize<R: Resource>(stmt: &mut Statement<'_>, args: &[Value]) -> Result<Vec<R>, RepoError> {
    let now = Utc::now();

    let mut rows = stmt
        .query(params_from_iter(args.iter()))
        .map_err(RepoError::Query)?;

    let mut items = Vec::new();
    while let Some(row) = rows.next().map_err(RepoError::Query)? {
        let item = R::from_row(row, now).map_err(|source| RepoError::Materialize {
            resource: R::NAME,
            source,
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Read a timestamp column
///
/// Text must parse with [`parse_timestamp`]; integers are Unix seconds.
pub fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            parse_timestamp(text)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        }
        ValueRef::Integer(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs)),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            row.as_ref()
                .column_name(idx)
                .map(String::from)
                .unwrap_or_default(),
            other.data_type(),
        )),
    }
}

/// Parse a stored timestamp
///
/// Accepts RFC 3339, SQLite's `YYYY-MM-DD HH:MM:SS[.fff]` family and bare
/// `YYYY-MM-DD` dates. Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let s = s.trim();

    let first_err = match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(first_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rusqlite::Connection;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2021-03-02T09:30:00+10:00").unwrap();
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_parse_sqlite_datetime() {
        let dt = parse_timestamp("2021-03-02 09:30:15").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (9, 30, 15));

        let frac = parse_timestamp("2021-03-02 09:30:15.250").unwrap();
        assert_eq!(frac.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_space_separated_with_offset() {
        let dt = parse_timestamp("2021-03-02 09:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 7);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2021-03-02").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 3, 2));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
        assert!(parse_timestamp("2021-02-30").is_err());
    }

    #[test]
    fn test_timestamp_column_reads_sqlite_date() {
        let conn = Connection::open_in_memory().unwrap();
        let dt = conn
            .query_row("SELECT date('2021-03-02 17:45:00')", [], |row| timestamp_column(row, 0))
            .unwrap();
        assert_eq!(dt, parse_timestamp("2021-03-02T00:00:00Z").unwrap());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_timestamp("next tuesday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_timestamp_column_reads_text_and_integer() {
        let conn = Connection::open_in_memory().unwrap();
        let (text, int): (DateTime<Utc>, DateTime<Utc>) = conn
            .query_row(
                "SELECT '2021-03-02T00:00:00Z', 1614643200",
                [],
                |row| Ok((timestamp_column(row, 0)?, timestamp_column(row, 1)?)),
            )
            .unwrap();
        assert_eq!(text, int);
        assert_eq!(text.year(), 2021);
    }

    #[test]
    fn test_timestamp_column_rejects_unparseable_text() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.query_row("SELECT 'not a time'", [], |row| timestamp_column(row, 0));
        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _))
        ));
    }

    #[test]
    fn test_timestamp_column_rejects_null() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.query_row("SELECT NULL", [], |row| timestamp_column(row, 0));
        assert!(matches!(
            result,
            Err(rusqlite::Error::InvalidColumnType(0, _, Type::Null))
        ));
    }
}
