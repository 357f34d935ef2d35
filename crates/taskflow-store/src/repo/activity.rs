use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::{Activity, ActivityStatus};
use taskflow_core::rules::scope::Scope;

use super::account::{collect_status_counts, scope_clause, StatusCount};
use super::rows::{date_text, opt_date, parsed, timestamp};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

const ACTIVITY_COLUMNS: &str = "id, activity_reference_number, account_reference_number, \
     referenceid, tsm, manager, company_name, type_client, status, scheduled_date, remarks, \
     created_at, updated_at";

fn map_activity(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        activity_reference_number: row.get("activity_reference_number")?,
        account_reference_number: row.get("account_reference_number")?,
        referenceid: row.get("referenceid")?,
        tsm: row.get("tsm")?,
        manager: row.get("manager")?,
        company_name: row.get("company_name")?,
        type_client: row.get("type_client")?,
        status: parsed(row, "status")?,
        scheduled_date: opt_date(row, "scheduled_date")?,
        remarks: row.get("remarks")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

impl SqliteRepo {
    pub fn insert_activity(conn: &Connection, activity: &Activity) -> Result<()> {
        conn.execute(
            "INSERT INTO activity (id, activity_reference_number, account_reference_number,
                referenceid, tsm, manager, company_name, type_client, status, scheduled_date,
                remarks, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                activity.id,
                activity.activity_reference_number,
                activity.account_reference_number,
                activity.referenceid,
                activity.tsm,
                activity.manager,
                activity.company_name,
                activity.type_client,
                activity.status.as_str(),
                date_text(activity.scheduled_date),
                activity.remarks,
                activity.created_at.timestamp(),
                activity.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_activity(
        conn: &Connection,
        activity_reference_number: &str,
    ) -> Result<Option<Activity>> {
        conn.query_row(
            &format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activity WHERE activity_reference_number = ?1"
            ),
            [activity_reference_number],
            map_activity,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// A TSA's activities, optionally bounded by scheduled date (inclusive).
    /// Unscheduled activities are only returned when no bound is given.
    pub fn list_activities(
        conn: &Connection,
        referenceid: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Activity>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activity
                 WHERE referenceid = ?1
                   AND (?2 IS NULL OR scheduled_date >= ?2)
                   AND (?3 IS NULL OR scheduled_date <= ?3)
                 ORDER BY scheduled_date DESC, created_at DESC, rowid DESC"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(
                params![referenceid, date_text(from), date_text(to)],
                map_activity,
            )
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    pub fn update_activity_status(
        conn: &Connection,
        activity_reference_number: &str,
        status: ActivityStatus,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE activity SET status = ?2, updated_at = ?3 WHERE activity_reference_number = ?1",
            params![
                activity_reference_number,
                status.as_str(),
                super::now().timestamp()
            ],
        )
        .map_err(from_rusqlite)
    }

    pub fn delete_activity(conn: &Connection, activity_reference_number: &str) -> Result<usize> {
        conn.execute(
            "DELETE FROM activity WHERE activity_reference_number = ?1",
            [activity_reference_number],
        )
        .map_err(from_rusqlite)
    }

    pub fn count_activities_by_status(
        conn: &Connection,
        scope: &Scope,
    ) -> Result<Vec<StatusCount>> {
        let (clause, args) = scope_clause(scope);
        collect_status_counts(
            conn,
            &format!(
                "SELECT status, COUNT(*) FROM activity {clause} GROUP BY status ORDER BY status"
            ),
            &args,
        )
    }
}
