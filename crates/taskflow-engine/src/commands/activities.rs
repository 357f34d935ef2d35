use rusqlite::Connection;
use taskflow_core::model::{Activity, ActivityStatus, NewActivity};
use taskflow_core::rules::numbering;
use taskflow_core::rules::validation::{clean, parse_date, require, require_str};
use taskflow_core::TaskflowError;
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::{new_id, observed};

/// A TSA's activities, optionally within `[from, to]` (YYYY-MM-DD).
///
/// ## Errors
///
/// - `MissingField`: `referenceid` absent
/// - `InvalidInput`: malformed date bound, or `from` after `to`
pub fn list_activities(
    conn: &Connection,
    referenceid: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<Activity>> {
    observed("list_activities", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        let from = parse_date("from", from)?;
        let to = parse_date("to", to)?;
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(TaskflowError::InvalidField {
                    field: "from".to_string(),
                    reason: "must not be after `to`".to_string(),
                }
                .into());
            }
        }
        SqliteRepo::list_activities(conn, referenceid, from, to)
    })
}

/// ## Errors
///
/// - `MissingField`: account reference, owner or company name absent
pub fn create_activity(conn: &Connection, input: NewActivity) -> Result<Activity> {
    let subject = input.referenceid.clone().unwrap_or_default();
    observed("create_activity", &subject, || {
        let account_reference_number =
            require("account_reference_number", input.account_reference_number)?;
        let referenceid = require("referenceid", input.referenceid)?;
        let company_name = require("company_name", input.company_name)?;
        let ts = now();

        let activity = Activity {
            id: new_id(),
            activity_reference_number: numbering::reference_number("ACT", &company_name),
            account_reference_number,
            referenceid,
            tsm: clean(input.tsm),
            manager: clean(input.manager),
            company_name,
            type_client: clean(input.type_client),
            status: input.status.unwrap_or(ActivityStatus::Scheduled),
            scheduled_date: input.scheduled_date,
            remarks: clean(input.remarks),
            created_at: ts,
            updated_at: ts,
        };
        SqliteRepo::insert_activity(conn, &activity)?;
        Ok(activity)
    })
}

/// ## Errors
///
/// - `MissingField` / `InvalidInput`: status absent or unknown
/// - `NotFound`: zero rows matched
pub fn update_activity_status(
    conn: &Connection,
    activity_reference_number: &str,
    status: Option<&str>,
) -> Result<Activity> {
    observed("update_activity_status", activity_reference_number, || {
        let status: ActivityStatus = require_str("status", status)?.parse()?;
        let not_found = || TaskflowError::ActivityNotFound {
            activity_reference_number: activity_reference_number.to_string(),
        };
        if SqliteRepo::update_activity_status(conn, activity_reference_number, status)? == 0 {
            return Err(not_found().into());
        }
        Ok(SqliteRepo::get_activity(conn, activity_reference_number)?.ok_or_else(not_found)?)
    })
}

/// ## Errors
///
/// - `NotFound`: zero rows deleted
pub fn delete_activity(conn: &Connection, activity_reference_number: &str) -> Result<()> {
    observed("delete_activity", activity_reference_number, || {
        if SqliteRepo::delete_activity(conn, activity_reference_number)? == 0 {
            return Err(TaskflowError::ActivityNotFound {
                activity_reference_number: activity_reference_number.to_string(),
            }
            .into());
        }
        Ok(())
    })
}
