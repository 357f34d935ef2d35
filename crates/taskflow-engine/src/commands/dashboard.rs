use rusqlite::Connection;
use serde::Serialize;
use taskflow_core::model::Role;
use taskflow_core::rules::scope::Scope;
use taskflow_core::rules::validation::require_str;
use taskflow_store::migrations;
use taskflow_store::repo::StatusCount;
use taskflow_store::{Result, SqliteRepo};

use super::observed;
use super::users::load_user;

/// Per-status counts over everything the viewer's role can see
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub referenceid: String,
    pub role: Role,
    pub accounts: Vec<StatusCount>,
    pub activities: Vec<StatusCount>,
    pub tickets: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub schema_version: Option<String>,
}

/// ## Errors
///
/// - `MissingField`: `referenceid` absent
/// - `NotFound`: unknown user
pub fn dashboard_summary(conn: &Connection, referenceid: Option<&str>) -> Result<DashboardSummary> {
    observed("dashboard_summary", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        let viewer = load_user(conn, referenceid)?;
        let scope = Scope::for_user(&viewer);
        Ok(DashboardSummary {
            accounts: SqliteRepo::count_accounts_by_status(conn, &scope)?,
            activities: SqliteRepo::count_activities_by_status(conn, &scope)?,
            tickets: SqliteRepo::count_tickets_by_status(conn, &scope)?,
            referenceid: viewer.referenceid,
            role: viewer.role,
        })
    })
}

/// Liveness plus the applied schema version.
///
/// ## Errors
///
/// - `Persistence`: the database cannot be queried
pub fn health(conn: &Connection) -> Result<Health> {
    Ok(Health {
        status: "ok",
        schema_version: migrations::current_version(conn)?,
    })
}
