use rusqlite::Connection;
use taskflow_core::model::{SecurityAlert, TaskLog};
use taskflow_core::rules::validation::{normalize_email, require_str};
use taskflow_store::{Result, SqliteRepo};

use super::observed;

/// Most task-log rows returned for one user
pub const TASK_LOG_LIMIT: u32 = 200;

/// Sign-in/sign-out history, newest first.
///
/// ## Errors
///
/// - `MissingField`: `referenceid` absent
pub fn list_task_logs(conn: &Connection, referenceid: Option<&str>) -> Result<Vec<TaskLog>> {
    observed("list_task_logs", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        SqliteRepo::list_task_logs(conn, referenceid, TASK_LOG_LIMIT)
    })
}

/// ## Errors
///
/// - `MissingField` / `InvalidInput`: e-mail absent or malformed
pub fn list_security_alerts(conn: &Connection, email: Option<&str>) -> Result<Vec<SecurityAlert>> {
    observed("list_security_alerts", "-", || {
        let email = normalize_email("email", require_str("email", email)?)?;
        SqliteRepo::list_security_alerts(conn, &email)
    })
}
