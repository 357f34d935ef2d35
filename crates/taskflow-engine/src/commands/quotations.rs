//! Quotation edits with revision snapshots, and quotation-number
//! generation and reservation.
//!
//! The revision counter is derived from the rows already stored, so the
//! count, the snapshot insert and the live-row update share one
//! `BEGIN IMMEDIATE` transaction. SQLite admits one such writer at a time
//! and `revision_label` is UNIQUE, so two edits can never mint the same
//! label.

use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use taskflow_core::errors::TfErrorKind;
use taskflow_core::model::{History, QuotationNumber, QuotationUpdate, Revision};
use taskflow_core::rules::numbering;
use taskflow_core::rules::validation::{clean, non_negative_amount, require_str};
use taskflow_core::TaskflowError;
use taskflow_store::errors::from_rusqlite;
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::observed;

/// Result of [`update_quotation`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationEdit {
    pub history: History,
    /// Snapshot of the prior values, when one was requested
    pub revision: Option<Revision>,
}

/// Edit the quotation fields of a history row, optionally snapshotting
/// the prior values as a labelled revision first.
///
/// ## Errors
///
/// - `InvalidInput`: nothing to change, a negative amount, or a revision
///   requested for a row with no quotation number
/// - `NotFound`: no history row with this id
/// - `Conflict`: the revision label already exists
pub fn update_quotation(
    conn: &mut Connection,
    history_id: i64,
    mut update: QuotationUpdate,
) -> Result<QuotationEdit> {
    observed("update_quotation", &history_id.to_string(), || {
        if !update.has_changes() {
            return Err(TaskflowError::InvalidField {
                field: "body".to_string(),
                reason: "no quotation fields to update".to_string(),
            }
            .into());
        }
        update.quotation_amount =
            non_negative_amount("quotation_amount", update.quotation_amount)?;
        update.so_amount = non_negative_amount("so_amount", update.so_amount)?;
        let revised_by = clean(update.revised_by.take());

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let current = SqliteRepo::get_history(&tx, history_id)?
            .ok_or(TaskflowError::HistoryNotFound { history_id })?;

        let revision = if update.create_revision {
            let original = current.quotation_number.clone().ok_or_else(|| {
                TaskflowError::InvalidField {
                    field: "quotation_number".to_string(),
                    reason: "history row has no quotation number to revise".to_string(),
                }
            })?;
            let prior = SqliteRepo::count_revisions(&tx, &current.activity_reference_number)?;
            let label = numbering::revision_label(prior, &original);

            let mut revision = Revision {
                id: 0,
                history_id,
                activity_reference_number: current.activity_reference_number.clone(),
                revision_label: label.clone(),
                quotation_number: current.quotation_number.clone(),
                quotation_amount: current.quotation_amount,
                quotation_status: current.quotation_status.clone(),
                remarks: current.remarks.clone(),
                revised_by,
                created_at: now(),
            };
            revision.id = SqliteRepo::insert_revision(&tx, &revision).map_err(|e| {
                if e.kind() == TfErrorKind::Conflict {
                    TaskflowError::RevisionLabelConflict { label }.into()
                } else {
                    e
                }
            })?;
            tracing::debug!(label = %revision.revision_label, "revision snapshot stored");
            Some(revision)
        } else {
            None
        };

        let mut next = update.apply_to(&current);
        next.updated_at = now();
        if SqliteRepo::update_quotation_fields(&tx, &next)? == 0 {
            return Err(TaskflowError::HistoryNotFound { history_id }.into());
        }
        tx.commit().map_err(from_rusqlite)?;

        Ok(QuotationEdit {
            history: next,
            revision,
        })
    })
}

/// ## Errors
///
/// - `MissingField`: `activity_reference_number` absent
pub fn list_revisions(
    conn: &Connection,
    activity_reference_number: Option<&str>,
) -> Result<Vec<Revision>> {
    observed(
        "list_revisions",
        activity_reference_number.unwrap_or_default(),
        || {
            let arn = require_str("activity_reference_number", activity_reference_number)?;
            SqliteRepo::list_revisions(conn, arn)
        },
    )
}

/// Mint the next `<PREFIX>-<NNNN>` number for a prefix, unreserved.
///
/// ## Errors
///
/// - `MissingField`: prefix or `referenceid` absent
/// - `InvalidInput`: prefix not 2-10 letters or digits
pub fn generate_quotation_number(
    conn: &mut Connection,
    prefix: Option<&str>,
    referenceid: Option<&str>,
) -> Result<QuotationNumber> {
    observed(
        "generate_quotation_number",
        referenceid.unwrap_or_default(),
        || {
            require_str("referenceid", referenceid)?;
            let prefix = numbering::normalize_prefix(require_str("prefix", prefix)?)?;

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(from_rusqlite)?;
            let sequence = SqliteRepo::next_quotation_sequence(&tx, &prefix)?;
            let number = QuotationNumber {
                quotation_number: numbering::quotation_number(&prefix, sequence),
                prefix,
                sequence,
                reserved: false,
                reserved_by: None,
                reserved_at: None,
                created_at: now(),
            };
            SqliteRepo::insert_quotation_number(&tx, &number)?;
            tx.commit().map_err(from_rusqlite)?;
            Ok(number)
        },
    )
}

/// Claim a generated number for `referenceid`. Succeeds exactly once per
/// number.
///
/// ## Errors
///
/// - `MissingField`: number or `referenceid` absent
/// - `NotFound`: the number was never generated
/// - `Conflict`: already reserved (the holder is reported)
pub fn reserve_quotation_number(
    conn: &Connection,
    quotation_number: Option<&str>,
    referenceid: Option<&str>,
) -> Result<QuotationNumber> {
    observed(
        "reserve_quotation_number",
        quotation_number.unwrap_or_default(),
        || {
            let number = require_str("quotation_number", quotation_number)?;
            let referenceid = require_str("referenceid", referenceid)?;

            let claimed = SqliteRepo::reserve_quotation_number(conn, number, referenceid, now())?;
            let stored = SqliteRepo::get_quotation_number(conn, number)?;
            match (claimed, stored) {
                (1, Some(stored)) => Ok(stored),
                (_, None) => Err(TaskflowError::QuotationNumberNotFound {
                    quotation_number: number.to_string(),
                }
                .into()),
                (_, Some(stored)) => Err(TaskflowError::QuotationAlreadyReserved {
                    quotation_number: number.to_string(),
                    reserved_by: stored.reserved_by,
                }
                .into()),
            }
        },
    )
}
