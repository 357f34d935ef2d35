//! Column decoding shared by the row mappers

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("column {column}: {reason}")]
struct ColumnDecodeError {
    column: String,
    reason: String,
}

fn decode_error(column: &str, ty: Type, reason: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        ty,
        Box::new(ColumnDecodeError {
            column: column.to_string(),
            reason,
        }),
    )
}

/// Current time at the precision the store keeps (whole seconds), so a
/// record built in memory equals the same record read back.
pub fn now() -> DateTime<Utc> {
    let secs = Utc::now().timestamp();
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

pub(crate) fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(column)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| decode_error(column, Type::Integer, format!("out of range: {secs}")))
}

pub(crate) fn opt_timestamp(
    row: &Row<'_>,
    column: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(column)? {
        None => Ok(None),
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .map(Some)
            .ok_or_else(|| decode_error(column, Type::Integer, format!("out of range: {secs}"))),
    }
}

pub(crate) fn opt_date(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(column)? {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| decode_error(column, Type::Text, e.to_string())),
    }
}

pub(crate) fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Parse a text column through the domain `FromStr` (status and role enums).
pub(crate) fn parsed<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(column)?;
    raw.parse()
        .map_err(|e: T::Err| decode_error(column, Type::Text, e.to_string()))
}
