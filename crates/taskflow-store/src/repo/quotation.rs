use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::QuotationNumber;

use super::rows::{opt_timestamp, timestamp};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

fn map_quotation_number(row: &Row<'_>) -> rusqlite::Result<QuotationNumber> {
    Ok(QuotationNumber {
        quotation_number: row.get("quotation_number")?,
        prefix: row.get("prefix")?,
        sequence: row.get("sequence")?,
        reserved: row.get("reserved")?,
        reserved_by: row.get("reserved_by")?,
        reserved_at: opt_timestamp(row, "reserved_at")?,
        created_at: timestamp(row, "created_at")?,
    })
}

impl SqliteRepo {
    /// Next free sequence for a prefix (1 for a new prefix).
    pub fn next_quotation_sequence(conn: &Connection, prefix: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COALESCE(MAX(sequence), 0) + 1 FROM quotation_numbers WHERE prefix = ?1",
            [prefix],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    pub fn insert_quotation_number(conn: &Connection, number: &QuotationNumber) -> Result<()> {
        conn.execute(
            "INSERT INTO quotation_numbers (quotation_number, prefix, sequence, reserved,
                reserved_by, reserved_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                number.quotation_number,
                number.prefix,
                number.sequence,
                number.reserved,
                number.reserved_by,
                number.reserved_at.map(|t| t.timestamp()),
                number.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_quotation_number(
        conn: &Connection,
        quotation_number: &str,
    ) -> Result<Option<QuotationNumber>> {
        conn.query_row(
            "SELECT quotation_number, prefix, sequence, reserved, reserved_by, reserved_at,
                created_at
             FROM quotation_numbers WHERE quotation_number = ?1",
            [quotation_number],
            map_quotation_number,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Claim an unreserved number. Returns 0 when the number is unknown or
    /// already claimed; SQLite serializes writers so at most one caller
    /// ever sees 1.
    pub fn reserve_quotation_number(
        conn: &Connection,
        quotation_number: &str,
        reserved_by: &str,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE quotation_numbers SET reserved = 1, reserved_by = ?2, reserved_at = ?3
             WHERE quotation_number = ?1 AND reserved = 0",
            params![quotation_number, reserved_by, at.timestamp()],
        )
        .map_err(from_rusqlite)
    }
}
