//! Account operations: listing (cache-aside), creation, edits, soft
//! removal, duplicate checks and owner transfers.

use std::time::Duration;

use rusqlite::{Connection, TransactionBehavior};
use taskflow_core::model::{Account, AccountPatch, AccountStatus, NewAccount};
use taskflow_core::rules::duplicate::{self, DuplicateMatch};
use taskflow_core::rules::numbering;
use taskflow_core::rules::validation::{clean, require, require_str};
use taskflow_core::TaskflowError;
use taskflow_store::cache::{keys, Cache};
use taskflow_store::errors::from_rusqlite;
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::{cache_evict, cache_read, cache_write, new_id, observed};

/// List a TSA's accounts, optionally filtered by status.
///
/// Served from the cache when possible; the store result is cached for
/// `ttl`.
///
/// ## Errors
///
/// - `MissingField`: `referenceid` absent or blank
/// - `InvalidStatus`: unknown status filter
pub fn list_accounts(
    conn: &Connection,
    cache: &dyn Cache,
    ttl: Duration,
    referenceid: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<Account>> {
    observed("list_accounts", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<AccountStatus>()?),
            None => None,
        };

        let key = keys::accounts(referenceid, status);
        if let Some(hit) = cache_read::<Vec<Account>>(cache, &key) {
            return Ok(hit);
        }

        let accounts = SqliteRepo::list_accounts(conn, referenceid, status)?;
        cache_write(cache, &key, &accounts, ttl);
        Ok(accounts)
    })
}

/// Create an account owned by `referenceid`.
///
/// ## Errors
///
/// - `MissingField`: `referenceid` or `company_name` absent
/// - `Conflict`: generated reference number collided
pub fn create_account(conn: &Connection, cache: &dyn Cache, input: NewAccount) -> Result<Account> {
    let subject = input.referenceid.clone().unwrap_or_default();
    observed("create_account", &subject, || {
        let referenceid = require("referenceid", input.referenceid)?;
        let company_name = require("company_name", input.company_name)?;
        let ts = now();

        let account = Account {
            id: new_id(),
            account_reference_number: numbering::reference_number("ACC", &company_name),
            referenceid,
            tsm: clean(input.tsm),
            manager: clean(input.manager),
            company_name,
            contact_person: clean(input.contact_person),
            contact_number: clean(input.contact_number),
            email_address: clean(input.email_address),
            address: clean(input.address),
            region: clean(input.region),
            industry: clean(input.industry),
            type_client: clean(input.type_client),
            status: input.status.unwrap_or(AccountStatus::Active),
            transfer_to: None,
            remarks: None,
            created_at: ts,
            updated_at: ts,
        };

        SqliteRepo::insert_account(conn, &account)?;
        cache_evict(cache, keys::all_account_lists(&account.referenceid));
        Ok(account)
    })
}

/// ## Errors
///
/// - `NotFound`: no account with this id
pub fn get_account(conn: &Connection, id: &str) -> Result<Account> {
    observed("get_account", id, || {
        let id = require_str("id", Some(id))?;
        SqliteRepo::get_account(conn, id)?.ok_or_else(|| {
            TaskflowError::AccountNotFound {
                account_id: id.to_string(),
            }
            .into()
        })
    })
}

/// Apply a partial update and return the stored account.
///
/// ## Errors
///
/// - `InvalidInput`: empty patch, or a blank company name
/// - `NotFound`: zero rows matched
pub fn update_account(
    conn: &Connection,
    cache: &dyn Cache,
    id: &str,
    mut patch: AccountPatch,
) -> Result<Account> {
    observed("update_account", id, || {
        if patch.is_empty() {
            return Err(TaskflowError::InvalidField {
                field: "body".to_string(),
                reason: "no fields to update".to_string(),
            }
            .into());
        }
        if let Some(name) = patch.company_name.take() {
            patch.company_name = Some(require("company_name", Some(name))?);
        }

        if SqliteRepo::update_account(conn, id, &patch)? == 0 {
            return Err(TaskflowError::AccountNotFound {
                account_id: id.to_string(),
            }
            .into());
        }
        let account = SqliteRepo::get_account(conn, id)?.ok_or_else(|| {
            TaskflowError::AccountNotFound {
                account_id: id.to_string(),
            }
        })?;
        cache_evict(cache, keys::all_account_lists(&account.referenceid));
        Ok(account)
    })
}

/// Soft-remove several accounts atomically. Ids that are unknown or
/// already removed are skipped; the number actually removed is returned.
///
/// ## Errors
///
/// - `MissingField`: empty id list
/// - `NotFound`: none of the ids matched a live account
pub fn bulk_remove_accounts(
    conn: &mut Connection,
    cache: &dyn Cache,
    ids: &[String],
) -> Result<usize> {
    observed("bulk_remove_accounts", &ids.len().to_string(), || {
        if ids.iter().all(|id| id.trim().is_empty()) {
            return Err(TaskflowError::MissingField {
                field: "ids".to_string(),
            }
            .into());
        }

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let mut removed = 0;
        let mut owners = Vec::new();
        for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            if let Some(account) = SqliteRepo::get_account(&tx, id)? {
                if SqliteRepo::remove_account(&tx, id)? == 1 {
                    removed += 1;
                    owners.push(account.referenceid);
                }
            }
        }
        if removed == 0 {
            return Err(TaskflowError::NoRowsAffected {
                entity: "account".to_string(),
                id: ids.join(","),
            }
            .into());
        }
        tx.commit().map_err(from_rusqlite)?;

        for owner in owners {
            cache_evict(cache, keys::all_account_lists(&owner));
        }
        Ok(removed)
    })
}

/// Ask to move accounts to another TSA. The accounts stay with their
/// owner, marked `Pending Transfer`, until approved.
///
/// ## Errors
///
/// - `MissingField`: no ids or no `transfer_to`
/// - `NotFound`: target user unknown, or no id matched a live account
pub fn request_transfer(
    conn: &mut Connection,
    cache: &dyn Cache,
    ids: &[String],
    transfer_to: Option<&str>,
) -> Result<usize> {
    observed("request_transfer", transfer_to.unwrap_or_default(), || {
        let transfer_to = require_str("transfer_to", transfer_to)?;
        if ids.iter().all(|id| id.trim().is_empty()) {
            return Err(TaskflowError::MissingField {
                field: "ids".to_string(),
            }
            .into());
        }
        if SqliteRepo::get_user(conn, transfer_to)?.is_none() {
            return Err(TaskflowError::UserNotFound {
                referenceid: transfer_to.to_string(),
            }
            .into());
        }

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let mut marked = 0;
        let mut owners = Vec::new();
        for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            if let Some(account) = SqliteRepo::get_account(&tx, id)? {
                if SqliteRepo::mark_transfer_pending(&tx, id, transfer_to)? == 1 {
                    marked += 1;
                    owners.push(account.referenceid);
                }
            }
        }
        if marked == 0 {
            return Err(TaskflowError::NoRowsAffected {
                entity: "account".to_string(),
                id: ids.join(","),
            }
            .into());
        }
        tx.commit().map_err(from_rusqlite)?;

        for owner in owners {
            cache_evict(cache, keys::all_account_lists(&owner));
        }
        Ok(marked)
    })
}

/// Approve or reject a pending transfer.
///
/// On approval the account moves to the target TSA and takes that TSA's
/// `tsm` and `manager`; on rejection it stays and becomes `Active` again.
///
/// ## Errors
///
/// - `NotFound`: unknown account, or no transfer pending
pub fn approve_transfer(
    conn: &mut Connection,
    cache: &dyn Cache,
    id: &str,
    approve: bool,
) -> Result<Account> {
    observed("approve_transfer", id, || {
        let id = require_str("id", Some(id))?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let account = SqliteRepo::get_account(&tx, id)?.ok_or_else(|| {
            TaskflowError::AccountNotFound {
                account_id: id.to_string(),
            }
        })?;
        let pending_to = match (&account.status, &account.transfer_to) {
            (AccountStatus::PendingTransfer, Some(to)) => to.clone(),
            _ => {
                return Err(TaskflowError::NoRowsAffected {
                    entity: "pending transfer".to_string(),
                    id: id.to_string(),
                }
                .into())
            }
        };

        let rows = if approve {
            let target = SqliteRepo::get_user(&tx, &pending_to)?;
            let tsm = target.as_ref().and_then(|u| u.tsm.clone());
            let manager = target.as_ref().and_then(|u| u.manager.clone());
            SqliteRepo::complete_transfer(&tx, id, tsm.as_deref(), manager.as_deref())?
        } else {
            SqliteRepo::cancel_transfer(&tx, id)?
        };
        if rows == 0 {
            return Err(TaskflowError::NoRowsAffected {
                entity: "pending transfer".to_string(),
                id: id.to_string(),
            }
            .into());
        }

        let updated = SqliteRepo::get_account(&tx, id)?.ok_or_else(|| {
            TaskflowError::AccountNotFound {
                account_id: id.to_string(),
            }
        })?;
        tx.commit().map_err(from_rusqlite)?;

        cache_evict(cache, keys::all_account_lists(&account.referenceid));
        cache_evict(cache, keys::all_account_lists(&pending_to));
        Ok(updated)
    })
}

/// Find live accounts whose company name resembles `company_name`.
///
/// ## Errors
///
/// - `InvalidInput`: query shorter than three characters
pub fn check_duplicate(conn: &Connection, company_name: Option<&str>) -> Result<Vec<DuplicateMatch>> {
    observed("check_duplicate", company_name.unwrap_or_default(), || {
        let normalized = duplicate::prepare_query(company_name.unwrap_or_default())?;
        let token = duplicate::prefilter_token(&normalized);
        let candidates = SqliteRepo::find_duplicate_candidates(conn, token)?;
        Ok(duplicate::rank_candidates(&normalized, &candidates))
    })
}
