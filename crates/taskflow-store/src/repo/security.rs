use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::{PasswordReset, SecurityAlert, TaskLog, TaskLogStatus};

use super::rows::{parsed, timestamp};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

fn map_task_log(row: &Row<'_>) -> rusqlite::Result<TaskLog> {
    Ok(TaskLog {
        id: row.get("id")?,
        referenceid: row.get("referenceid")?,
        email: row.get("email")?,
        status: parsed(row, "status")?,
        created_at: timestamp(row, "created_at")?,
    })
}

fn map_security_alert(row: &Row<'_>) -> rusqlite::Result<SecurityAlert> {
    Ok(SecurityAlert {
        id: row.get("id")?,
        email: row.get("email")?,
        referenceid: row.get("referenceid")?,
        alert_type: row.get("alert_type")?,
        message: row.get("message")?,
        created_at: timestamp(row, "created_at")?,
    })
}

fn map_password_reset(row: &Row<'_>) -> rusqlite::Result<PasswordReset> {
    Ok(PasswordReset {
        id: row.get("id")?,
        email: row.get("email")?,
        token_hash: row.get("token_hash")?,
        expires_at: timestamp(row, "expires_at")?,
        used: row.get("used")?,
        created_at: timestamp(row, "created_at")?,
    })
}

impl SqliteRepo {
    pub fn insert_task_log(
        conn: &Connection,
        referenceid: &str,
        email: &str,
        status: TaskLogStatus,
        at: DateTime<Utc>,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO task_logs (referenceid, email, status, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![referenceid, email, status.as_str(), at.timestamp()],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent entries first.
    pub fn list_task_logs(conn: &Connection, referenceid: &str, limit: u32) -> Result<Vec<TaskLog>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, referenceid, email, status, created_at FROM task_logs
                 WHERE referenceid = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params![referenceid, limit], map_task_log)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    pub fn insert_security_alert(
        conn: &Connection,
        email: &str,
        referenceid: Option<&str>,
        alert_type: &str,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO security_alerts (email, referenceid, alert_type, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![email, referenceid, alert_type, message, at.timestamp()],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_security_alerts(conn: &Connection, email: &str) -> Result<Vec<SecurityAlert>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, email, referenceid, alert_type, message, created_at
                 FROM security_alerts WHERE email = ?1 COLLATE NOCASE
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([email], map_security_alert)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    pub fn insert_password_reset(
        conn: &Connection,
        email: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO password_resets (email, token_hash, expires_at, used, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![email, token_hash, expires_at.timestamp(), at.timestamp()],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_password_reset(conn: &Connection, token_hash: &str) -> Result<Option<PasswordReset>> {
        conn.query_row(
            "SELECT id, email, token_hash, expires_at, used, created_at
             FROM password_resets WHERE token_hash = ?1",
            [token_hash],
            map_password_reset,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Consume a reset token. Returns 0 if it was already used.
    pub fn mark_password_reset_used(conn: &Connection, id: i64) -> Result<usize> {
        conn.execute(
            "UPDATE password_resets SET used = 1 WHERE id = ?1 AND used = 0",
            [id],
        )
        .map_err(from_rusqlite)
    }
}
