use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::{History, Revision};

use super::rows::timestamp;
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

const HISTORY_COLUMNS: &str = "id, activity_reference_number, referenceid, type_activity, \
     call_status, quotation_number, quotation_amount, quotation_status, so_number, so_amount, \
     remarks, created_at, updated_at";

const REVISION_COLUMNS: &str = "id, history_id, activity_reference_number, revision_label, \
     quotation_number, quotation_amount, quotation_status, remarks, revised_by, created_at";

fn map_history(row: &Row<'_>) -> rusqlite::Result<History> {
    Ok(History {
        id: row.get("id")?,
        activity_reference_number: row.get("activity_reference_number")?,
        referenceid: row.get("referenceid")?,
        type_activity: row.get("type_activity")?,
        call_status: row.get("call_status")?,
        quotation_number: row.get("quotation_number")?,
        quotation_amount: row.get("quotation_amount")?,
        quotation_status: row.get("quotation_status")?,
        so_number: row.get("so_number")?,
        so_amount: row.get("so_amount")?,
        remarks: row.get("remarks")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

fn map_revision(row: &Row<'_>) -> rusqlite::Result<Revision> {
    Ok(Revision {
        id: row.get("id")?,
        history_id: row.get("history_id")?,
        activity_reference_number: row.get("activity_reference_number")?,
        revision_label: row.get("revision_label")?,
        quotation_number: row.get("quotation_number")?,
        quotation_amount: row.get("quotation_amount")?,
        quotation_status: row.get("quotation_status")?,
        remarks: row.get("remarks")?,
        revised_by: row.get("revised_by")?,
        created_at: timestamp(row, "created_at")?,
    })
}

impl SqliteRepo {
    /// Insert a history row; `history.id` is ignored and the assigned id
    /// is returned.
    pub fn insert_history(conn: &Connection, history: &History) -> Result<i64> {
        conn.execute(
            "INSERT INTO history (activity_reference_number, referenceid, type_activity,
                call_status, quotation_number, quotation_amount, quotation_status, so_number,
                so_amount, remarks, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                history.activity_reference_number,
                history.referenceid,
                history.type_activity,
                history.call_status,
                history.quotation_number,
                history.quotation_amount,
                history.quotation_status,
                history.so_number,
                history.so_amount,
                history.remarks,
                history.created_at.timestamp(),
                history.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_history(conn: &Connection, id: i64) -> Result<Option<History>> {
        conn.query_row(
            &format!("SELECT {HISTORY_COLUMNS} FROM history WHERE id = ?1"),
            [id],
            map_history,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn list_history(conn: &Connection, referenceid: &str) -> Result<Vec<History>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {HISTORY_COLUMNS} FROM history WHERE referenceid = ?1
                 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([referenceid], map_history)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    pub fn list_history_for_activity(
        conn: &Connection,
        activity_reference_number: &str,
    ) -> Result<Vec<History>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {HISTORY_COLUMNS} FROM history WHERE activity_reference_number = ?1
                 ORDER BY created_at ASC, id ASC"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([activity_reference_number], map_history)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    /// Overwrite the quotation and sales-order fields of a history row.
    pub fn update_quotation_fields(conn: &Connection, history: &History) -> Result<usize> {
        conn.execute(
            "UPDATE history SET quotation_number = ?2, quotation_amount = ?3,
                quotation_status = ?4, so_number = ?5, so_amount = ?6, remarks = ?7,
                updated_at = ?8
             WHERE id = ?1",
            params![
                history.id,
                history.quotation_number,
                history.quotation_amount,
                history.quotation_status,
                history.so_number,
                history.so_amount,
                history.remarks,
                history.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)
    }

    pub fn count_revisions(conn: &Connection, activity_reference_number: &str) -> Result<u64> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM revised_quotations WHERE activity_reference_number = ?1",
                [activity_reference_number],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        Ok(count.max(0) as u64)
    }

    /// Insert a revision snapshot. A repeated label is a `Conflict`.
    pub fn insert_revision(conn: &Connection, revision: &Revision) -> Result<i64> {
        conn.execute(
            "INSERT INTO revised_quotations (history_id, activity_reference_number,
                revision_label, quotation_number, quotation_amount, quotation_status, remarks,
                revised_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                revision.history_id,
                revision.activity_reference_number,
                revision.revision_label,
                revision.quotation_number,
                revision.quotation_amount,
                revision.quotation_status,
                revision.remarks,
                revision.revised_by,
                revision.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Revisions of an activity's quotations, oldest first.
    pub fn list_revisions(
        conn: &Connection,
        activity_reference_number: &str,
    ) -> Result<Vec<Revision>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {REVISION_COLUMNS} FROM revised_quotations
                 WHERE activity_reference_number = ?1 ORDER BY id ASC"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([activity_reference_number], map_revision)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }
}
