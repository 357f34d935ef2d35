use rusqlite::Connection;
use taskflow_core::model::{History, NewHistory};
use taskflow_core::rules::validation::{clean, non_negative_amount, require, require_str};
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::observed;

/// ## Errors
///
/// - `MissingField`: `referenceid` absent
pub fn list_history(conn: &Connection, referenceid: Option<&str>) -> Result<Vec<History>> {
    observed("list_history", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        SqliteRepo::list_history(conn, referenceid)
    })
}

/// Entries for one activity, oldest first.
///
/// ## Errors
///
/// - `MissingField`: blank activity reference
pub fn list_history_for_activity(
    conn: &Connection,
    activity_reference_number: &str,
) -> Result<Vec<History>> {
    observed("list_history_for_activity", activity_reference_number, || {
        let arn = require_str("activity_reference_number", Some(activity_reference_number))?;
        SqliteRepo::list_history_for_activity(conn, arn)
    })
}

/// ## Errors
///
/// - `MissingField`: activity reference, owner or activity type absent
/// - `InvalidInput`: negative amount
pub fn create_history(conn: &Connection, input: NewHistory) -> Result<History> {
    let subject = input.activity_reference_number.clone().unwrap_or_default();
    observed("create_history", &subject, || {
        let ts = now();
        let mut history = History {
            id: 0,
            activity_reference_number: require(
                "activity_reference_number",
                input.activity_reference_number,
            )?,
            referenceid: require("referenceid", input.referenceid)?,
            type_activity: require("type_activity", input.type_activity)?,
            call_status: clean(input.call_status),
            quotation_number: clean(input.quotation_number),
            quotation_amount: non_negative_amount("quotation_amount", input.quotation_amount)?,
            quotation_status: clean(input.quotation_status),
            so_number: clean(input.so_number),
            so_amount: non_negative_amount("so_amount", input.so_amount)?,
            remarks: clean(input.remarks),
            created_at: ts,
            updated_at: ts,
        };
        history.id = SqliteRepo::insert_history(conn, &history)?;
        Ok(history)
    })
}
