use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::{User, UserStatus};
use taskflow_core::rules::scope::Scope;
use taskflow_core_types::Sensitive;

use super::account::scope_clause;
use super::rows::{opt_timestamp, parsed, timestamp};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

const USER_COLUMNS: &str = "id, referenceid, email, firstname, lastname, password_hash, role, \
     tsm, manager, department, status, login_attempts, locked_until, extra, created_at, \
     updated_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        referenceid: row.get("referenceid")?,
        email: row.get("email")?,
        firstname: row.get("firstname")?,
        lastname: row.get("lastname")?,
        password_hash: Sensitive::new(row.get("password_hash")?),
        role: parsed(row, "role")?,
        tsm: row.get("tsm")?,
        manager: row.get("manager")?,
        department: row.get("department")?,
        status: parsed(row, "status")?,
        login_attempts: row.get("login_attempts")?,
        locked_until: opt_timestamp(row, "locked_until")?,
        extra: row.get("extra")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

impl SqliteRepo {
    pub fn insert_user(conn: &Connection, user: &User) -> Result<()> {
        conn.execute(
            "INSERT INTO users (id, referenceid, email, firstname, lastname, password_hash,
                role, tsm, manager, department, status, login_attempts, locked_until, extra,
                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                user.id,
                user.referenceid,
                user.email,
                user.firstname,
                user.lastname,
                user.password_hash.expose(),
                user.role.as_str(),
                user.tsm,
                user.manager,
                user.department,
                user.status.as_str(),
                user.login_attempts,
                user.locked_until.map(|t| t.timestamp()),
                user.extra,
                user.created_at.timestamp(),
                user.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_user(conn: &Connection, referenceid: &str) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE referenceid = ?1"),
            [referenceid],
            map_user,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Lookup by e-mail; the column collates case-insensitively.
    pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            [email],
            map_user,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
        conn.query_row("SELECT 1 FROM users WHERE email = ?1", [email], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(from_rusqlite)
    }

    /// Users visible under a scope, by last then first name.
    pub fn list_users(conn: &Connection, scope: &Scope) -> Result<Vec<User>> {
        let (clause, args) = scope_clause(scope);
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users {clause} ORDER BY lastname, firstname"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), map_user)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    /// Write the self-editable profile fields.
    pub fn update_profile(conn: &Connection, user: &User) -> Result<usize> {
        conn.execute(
            "UPDATE users SET firstname = ?2, lastname = ?3, department = ?4, extra = ?5,
                updated_at = ?6
             WHERE referenceid = ?1",
            params![
                user.referenceid,
                user.firstname,
                user.lastname,
                user.department,
                user.extra,
                user.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)
    }

    pub fn record_failed_login(conn: &Connection, id: &str, attempts: u32) -> Result<usize> {
        conn.execute(
            "UPDATE users SET login_attempts = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, attempts, super::now().timestamp()],
        )
        .map_err(from_rusqlite)
    }

    pub fn lock_user(
        conn: &Connection,
        id: &str,
        attempts: u32,
        until: DateTime<Utc>,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE users SET login_attempts = ?2, status = ?3, locked_until = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                id,
                attempts,
                UserStatus::Locked.as_str(),
                until.timestamp(),
                super::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Zero the failure counter and lift any temporary lock.
    pub fn reset_login_state(conn: &Connection, id: &str) -> Result<usize> {
        conn.execute(
            "UPDATE users SET login_attempts = 0, locked_until = NULL,
                status = CASE WHEN status = ?2 THEN ?3 ELSE status END,
                updated_at = ?4
             WHERE id = ?1",
            params![
                id,
                UserStatus::Locked.as_str(),
                UserStatus::Active.as_str(),
                super::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)
    }

    pub fn update_password(
        conn: &Connection,
        email: &str,
        password_hash: &Sensitive<String>,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE email = ?1",
            params![email, password_hash.expose(), super::now().timestamp()],
        )
        .map_err(from_rusqlite)
    }
}
