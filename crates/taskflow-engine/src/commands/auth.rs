//! Sign-in with failed-attempt lockout, sign-out, and password resets.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use taskflow_core::credentials;
use taskflow_core::model::security::{ALERT_ACCOUNT_LOCKED, ALERT_PASSWORD_RESET};
use taskflow_core::model::{TaskLog, TaskLogStatus, UserProfile};
use taskflow_core::rules::lockout::{FailureOutcome, LockState, LockoutPolicy};
use taskflow_core::rules::validation::{normalize_email, require_str};
use taskflow_core::TaskflowError;
use taskflow_core_types::Sensitive;
use taskflow_store::cache::{keys, Cache};
use taskflow_store::errors::from_rusqlite;
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::users::load_user;
use super::{cache_evict, observed};

/// A freshly issued reset token. Delivery is the caller's concern.
#[derive(Debug, Clone, Serialize)]
pub struct ResetTicket {
    #[serde(serialize_with = "expose_token")]
    pub token: Sensitive<String>,
    pub expires_at: DateTime<Utc>,
}

fn expose_token<S: serde::Serializer>(
    token: &Sensitive<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose())
}

/// Verify credentials and open a session.
///
/// Each wrong password bumps the user's failure counter; reaching the
/// policy maximum locks the account for `lock_minutes` and records a
/// security alert. A lock whose time has passed is lifted before the
/// password is checked.
///
/// ## Errors
///
/// - `Unauthorised`: unknown e-mail or wrong password (with
///   `remaining_attempts` for a known user)
/// - `Locked`: account locked, now or by this attempt
/// - `Forbidden`: resigned, terminated or administratively locked user
pub fn login(
    conn: &mut Connection,
    cache: &dyn Cache,
    policy: &LockoutPolicy,
    email: Option<&str>,
    password: Option<&Sensitive<String>>,
) -> Result<UserProfile> {
    observed("login", "-", || {
        let email = normalize_email("email", require_str("email", email)?)?;
        let password = match password {
            Some(p) if !p.expose().is_empty() => p,
            _ => {
                return Err(TaskflowError::MissingField {
                    field: "password".to_string(),
                }
                .into())
            }
        };
        let at = now();

        let mut user = SqliteRepo::get_user_by_email(conn, &email)?.ok_or(
            TaskflowError::InvalidCredentials {
                remaining_attempts: None,
            },
        )?;

        match policy.lock_state(&user, at) {
            LockState::Locked(until) => return Err(TaskflowError::AccountLocked { until }.into()),
            LockState::Indefinite => {
                return Err(TaskflowError::AccountInactive {
                    status: user.status.to_string(),
                }
                .into())
            }
            LockState::Expired => {
                SqliteRepo::reset_login_state(conn, &user.id)?;
                cache_evict(cache, [keys::user(&user.referenceid)]);
                user = load_user(conn, &user.referenceid)?;
                tracing::debug!(referenceid = %user.referenceid, "expired lock cleared");
            }
            LockState::Open => {}
        }

        if user.status.is_separated() {
            return Err(TaskflowError::AccountInactive {
                status: user.status.to_string(),
            }
            .into());
        }

        if !credentials::verify_password(password, &user.password_hash)? {
            return match policy.register_failure(user.login_attempts, at) {
                FailureOutcome::Retry {
                    attempts,
                    remaining,
                } => {
                    SqliteRepo::record_failed_login(conn, &user.id, attempts)?;
                    Err(TaskflowError::InvalidCredentials {
                        remaining_attempts: Some(remaining),
                    }
                    .into())
                }
                FailureOutcome::Lock { attempts, until } => {
                    let tx = conn.transaction().map_err(from_rusqlite)?;
                    SqliteRepo::lock_user(&tx, &user.id, attempts, until)?;
                    SqliteRepo::insert_security_alert(
                        &tx,
                        &user.email,
                        Some(&user.referenceid),
                        ALERT_ACCOUNT_LOCKED,
                        &format!(
                            "Account locked after {attempts} failed sign-in attempts until {}",
                            until.to_rfc3339()
                        ),
                        at,
                    )?;
                    tx.commit().map_err(from_rusqlite)?;
                    cache_evict(cache, [keys::user(&user.referenceid)]);
                    Err(TaskflowError::AccountLocked { until }.into())
                }
            };
        }

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let had_failures = user.login_attempts > 0 || user.locked_until.is_some();
        if had_failures {
            SqliteRepo::reset_login_state(&tx, &user.id)?;
        }
        SqliteRepo::insert_task_log(&tx, &user.referenceid, &user.email, TaskLogStatus::Login, at)?;
        let profile = load_user(&tx, &user.referenceid)?.profile();
        tx.commit().map_err(from_rusqlite)?;
        if had_failures {
            cache_evict(cache, [keys::user(&user.referenceid)]);
        }
        Ok(profile)
    })
}

/// Close a session by writing a `Logout` task log.
///
/// ## Errors
///
/// - `MissingField`: `referenceid` absent
/// - `NotFound`: unknown user
pub fn logout(conn: &Connection, referenceid: Option<&str>) -> Result<TaskLog> {
    observed("logout", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        let user = load_user(conn, referenceid)?;
        let at = now();
        let id = SqliteRepo::insert_task_log(
            conn,
            &user.referenceid,
            &user.email,
            TaskLogStatus::Logout,
            at,
        )?;
        Ok(TaskLog {
            id,
            referenceid: user.referenceid,
            email: user.email,
            status: TaskLogStatus::Logout,
            created_at: at,
        })
    })
}

/// Issue a single-use reset token for `email`.
///
/// An unknown address yields `Ok(None)` so the endpoint does not reveal
/// which addresses are registered.
///
/// ## Errors
///
/// - `MissingField` / `InvalidInput`: e-mail absent or malformed
pub fn request_password_reset(
    conn: &Connection,
    ttl: chrono::Duration,
    email: Option<&str>,
) -> Result<Option<ResetTicket>> {
    observed("request_password_reset", "-", || {
        let email = normalize_email("email", require_str("email", email)?)?;
        let Some(user) = SqliteRepo::get_user_by_email(conn, &email)? else {
            return Ok(None);
        };

        let at = now();
        let token = credentials::new_reset_token();
        let expires_at = at + ttl;
        SqliteRepo::insert_password_reset(
            conn,
            &user.email,
            &credentials::token_digest(token.expose()),
            expires_at,
            at,
        )?;
        SqliteRepo::insert_security_alert(
            conn,
            &user.email,
            Some(&user.referenceid),
            ALERT_PASSWORD_RESET,
            "Password reset requested",
            at,
        )?;
        Ok(Some(ResetTicket { token, expires_at }))
    })
}

/// Set a new password using a reset token. The token is consumed and any
/// lockout on the account is lifted.
///
/// ## Errors
///
/// - `MissingField`: token or password absent
/// - `InvalidInput`: weak password, or a token that is unknown, expired
///   or already used
pub fn confirm_password_reset(
    conn: &mut Connection,
    cache: &dyn Cache,
    token: Option<&Sensitive<String>>,
    new_password: Option<&Sensitive<String>>,
) -> Result<()> {
    observed("confirm_password_reset", "-", || {
        let token = token
            .filter(|t| !t.expose().trim().is_empty())
            .ok_or_else(|| TaskflowError::MissingField {
                field: "token".to_string(),
            })?;
        let new_password = new_password.ok_or_else(|| TaskflowError::MissingField {
            field: "password".to_string(),
        })?;
        credentials::check_strength(new_password.expose())?;

        let digest = credentials::token_digest(token.expose());
        let at = now();
        let reset = SqliteRepo::get_password_reset(conn, &digest)?
            .filter(|r| r.is_usable(at))
            .ok_or(TaskflowError::ResetTokenInvalid)?;
        let hash = credentials::hash_password(new_password)?;

        let tx = conn.transaction().map_err(from_rusqlite)?;
        if SqliteRepo::mark_password_reset_used(&tx, reset.id)? == 0 {
            return Err(TaskflowError::ResetTokenInvalid.into());
        }
        if SqliteRepo::update_password(&tx, &reset.email, &hash)? == 0 {
            return Err(TaskflowError::ResetTokenInvalid.into());
        }
        let user = SqliteRepo::get_user_by_email(&tx, &reset.email)?;
        if let Some(user) = &user {
            SqliteRepo::reset_login_state(&tx, &user.id)?;
        }
        tx.commit().map_err(from_rusqlite)?;

        if let Some(user) = user {
            cache_evict(cache, [keys::user(&user.referenceid)]);
        }
        Ok(())
    })
}
