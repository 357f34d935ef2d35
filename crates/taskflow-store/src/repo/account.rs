use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::{Account, AccountPatch, AccountStatus};
use taskflow_core::rules::scope::Scope;

use super::rows::{parsed, timestamp};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

const ACCOUNT_COLUMNS: &str = "id, account_reference_number, referenceid, tsm, manager, \
     company_name, contact_person, contact_number, email_address, address, region, industry, \
     type_client, status, transfer_to, remarks, created_at, updated_at";

/// Upper bound on rows fed to the fuzzy duplicate matcher
const DUPLICATE_CANDIDATE_LIMIT: usize = 500;

/// A `(status, count)` pair for dashboard summaries
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

fn map_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get("id")?,
        account_reference_number: row.get("account_reference_number")?,
        referenceid: row.get("referenceid")?,
        tsm: row.get("tsm")?,
        manager: row.get("manager")?,
        company_name: row.get("company_name")?,
        contact_person: row.get("contact_person")?,
        contact_number: row.get("contact_number")?,
        email_address: row.get("email_address")?,
        address: row.get("address")?,
        region: row.get("region")?,
        industry: row.get("industry")?,
        type_client: row.get("type_client")?,
        status: parsed(row, "status")?,
        transfer_to: row.get("transfer_to")?,
        remarks: row.get("remarks")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

/// Build `WHERE <column> = ?` for a scope; the column comes from a fixed set.
pub(crate) fn scope_clause(scope: &Scope) -> (String, Vec<String>) {
    match scope.filter() {
        Some((column, value)) => (
            format!("WHERE {column} = ?"),
            vec![value.to_string()],
        ),
        None => (String::new(), Vec::new()),
    }
}

pub(crate) fn collect_status_counts(
    conn: &Connection,
    sql: &str,
    args: &[String],
) -> Result<Vec<StatusCount>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), |row| {
            Ok(StatusCount {
                status: row.get(0)?,
                count: row.get(1)?,
            })
        })
        .map_err(from_rusqlite)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(from_rusqlite)
}

impl SqliteRepo {
    pub fn insert_account(conn: &Connection, account: &Account) -> Result<()> {
        conn.execute(
            "INSERT INTO accounts (id, account_reference_number, referenceid, tsm, manager,
                company_name, contact_person, contact_number, email_address, address, region,
                industry, type_client, status, transfer_to, remarks, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                account.id,
                account.account_reference_number,
                account.referenceid,
                account.tsm,
                account.manager,
                account.company_name,
                account.contact_person,
                account.contact_number,
                account.email_address,
                account.address,
                account.region,
                account.industry,
                account.type_client,
                account.status.as_str(),
                account.transfer_to,
                account.remarks,
                account.created_at.timestamp(),
                account.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_account(conn: &Connection, id: &str) -> Result<Option<Account>> {
        conn.query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
            [id],
            map_account,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Accounts owned by one TSA, newest first.
    ///
    /// Without a status filter, removed accounts are left out.
    pub fn list_accounts(
        conn: &Connection,
        referenceid: &str,
        status: Option<AccountStatus>,
    ) -> Result<Vec<Account>> {
        let (sql, status_arg) = match status {
            Some(s) => (
                format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE referenceid = ?1 AND status = ?2
                     ORDER BY created_at DESC, rowid DESC"
                ),
                s.as_str(),
            ),
            None => (
                format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE referenceid = ?1 AND status != ?2
                     ORDER BY created_at DESC, rowid DESC"
                ),
                AccountStatus::Removed.as_str(),
            ),
        };
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params![referenceid, status_arg], map_account)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    /// Coarse prefilter for duplicate detection: live accounts whose name
    /// contains `token`, case-insensitively.
    ///
    /// Case is folded in Rust rather than with SQL `lower()`, which only
    /// folds ASCII.
    pub fn find_duplicate_candidates(conn: &Connection, token: &str) -> Result<Vec<Account>> {
        let needle = token.to_lowercase();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts
                 WHERE status != ?1
                 ORDER BY company_name"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params![AccountStatus::Removed.as_str()], map_account)
            .map_err(from_rusqlite)?;

        let mut found = Vec::new();
        for row in rows {
            let account = row.map_err(from_rusqlite)?;
            if account.company_name.to_lowercase().contains(&needle) {
                found.push(account);
                if found.len() >= DUPLICATE_CANDIDATE_LIMIT {
                    break;
                }
            }
        }
        Ok(found)
    }

    /// Apply the present fields of a patch.
    pub fn update_account(conn: &Connection, id: &str, patch: &AccountPatch) -> Result<usize> {
        conn.execute(
            "UPDATE accounts SET
                company_name = COALESCE(?2, company_name),
                contact_person = COALESCE(?3, contact_person),
                contact_number = COALESCE(?4, contact_number),
                email_address = COALESCE(?5, email_address),
                address = COALESCE(?6, address),
                region = COALESCE(?7, region),
                industry = COALESCE(?8, industry),
                type_client = COALESCE(?9, type_client),
                status = COALESCE(?10, status),
                remarks = COALESCE(?11, remarks),
                updated_at = ?12
             WHERE id = ?1",
            params![
                id,
                patch.company_name,
                patch.contact_person,
                patch.contact_number,
                patch.email_address,
                patch.address,
                patch.region,
                patch.industry,
                patch.type_client,
                patch.status.map(|s| s.as_str()),
                patch.remarks,
                super::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Soft-delete one account.
    pub fn remove_account(conn: &Connection, id: &str) -> Result<usize> {
        conn.execute(
            "UPDATE accounts SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status != ?2",
            params![
                id,
                AccountStatus::Removed.as_str(),
                super::now().timestamp()
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Mark a live account as awaiting transfer to another TSA.
    pub fn mark_transfer_pending(conn: &Connection, id: &str, transfer_to: &str) -> Result<usize> {
        conn.execute(
            "UPDATE accounts SET status = ?2, transfer_to = ?3, updated_at = ?4
             WHERE id = ?1 AND status != ?5",
            params![
                id,
                AccountStatus::PendingTransfer.as_str(),
                transfer_to,
                super::now().timestamp(),
                AccountStatus::Removed.as_str(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Hand a pending account to its target TSA and that TSA's hierarchy.
    pub fn complete_transfer(
        conn: &Connection,
        id: &str,
        tsm: Option<&str>,
        manager: Option<&str>,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE accounts SET referenceid = transfer_to, tsm = ?2, manager = ?3,
                transfer_to = NULL, status = ?4, updated_at = ?5
             WHERE id = ?1 AND status = ?6 AND transfer_to IS NOT NULL",
            params![
                id,
                tsm,
                manager,
                AccountStatus::Active.as_str(),
                super::now().timestamp(),
                AccountStatus::PendingTransfer.as_str(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Drop a pending transfer, leaving the account with its owner.
    pub fn cancel_transfer(conn: &Connection, id: &str) -> Result<usize> {
        conn.execute(
            "UPDATE accounts SET transfer_to = NULL, status = ?2, updated_at = ?3
             WHERE id = ?1 AND status = ?4",
            params![
                id,
                AccountStatus::Active.as_str(),
                super::now().timestamp(),
                AccountStatus::PendingTransfer.as_str(),
            ],
        )
        .map_err(from_rusqlite)
    }

    pub fn count_accounts_by_status(conn: &Connection, scope: &Scope) -> Result<Vec<StatusCount>> {
        let (clause, args) = scope_clause(scope);
        collect_status_counts(
            conn,
            &format!(
                "SELECT status, COUNT(*) FROM accounts {clause} GROUP BY status ORDER BY status"
            ),
            &args,
        )
    }
}
