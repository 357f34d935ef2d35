//! User profile reads and edits, team listing and account creation.

use std::time::Duration;

use rusqlite::Connection;
use taskflow_core::credentials;
use taskflow_core::model::{NewUser, ProfilePatch, User, UserProfile, UserStatus};
use taskflow_core::rules::scope::Scope;
use taskflow_core::rules::validation::{clean, normalize_email, require, require_str};
use taskflow_core::TaskflowError;
use taskflow_store::cache::{keys, Cache};
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::{cache_evict, cache_read, cache_write, new_id, observed};

pub(crate) fn load_user(conn: &Connection, referenceid: &str) -> Result<User> {
    SqliteRepo::get_user(conn, referenceid)?.ok_or_else(|| {
        TaskflowError::UserNotFound {
            referenceid: referenceid.to_string(),
        }
        .into()
    })
}

/// Public profile of a user, cache-aside.
///
/// ## Errors
///
/// - `MissingField`: `referenceid` absent
/// - `NotFound`: unknown user
pub fn get_user(
    conn: &Connection,
    cache: &dyn Cache,
    ttl: Duration,
    referenceid: Option<&str>,
) -> Result<UserProfile> {
    observed("get_user", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        let key = keys::user(referenceid);
        if let Some(hit) = cache_read::<UserProfile>(cache, &key) {
            return Ok(hit);
        }
        let profile = load_user(conn, referenceid)?.profile();
        cache_write(cache, &key, &profile, ttl);
        Ok(profile)
    })
}

/// Users visible to `referenceid` under its role, excluding itself.
///
/// ## Errors
///
/// - `MissingField`: `referenceid` absent
/// - `NotFound`: unknown user
pub fn list_team(conn: &Connection, referenceid: Option<&str>) -> Result<Vec<UserProfile>> {
    observed("list_team", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        let viewer = load_user(conn, referenceid)?;
        let team = SqliteRepo::list_users(conn, &Scope::for_user(&viewer))?;
        Ok(team
            .iter()
            .filter(|u| u.referenceid != viewer.referenceid)
            .map(User::profile)
            .collect())
    })
}

/// Self-service profile edit. `extra` keys are merged into the stored
/// document; a `null` value removes the key.
///
/// ## Errors
///
/// - `InvalidInput`: empty patch or blank name
/// - `NotFound`: unknown user
pub fn update_profile(
    conn: &Connection,
    cache: &dyn Cache,
    referenceid: &str,
    patch: ProfilePatch,
) -> Result<UserProfile> {
    observed("update_profile", referenceid, || {
        if patch.is_empty() {
            return Err(TaskflowError::InvalidField {
                field: "body".to_string(),
                reason: "no profile fields to update".to_string(),
            }
            .into());
        }
        let mut user = load_user(conn, referenceid)?;
        if let Some(first) = patch.firstname {
            user.firstname = require("firstname", Some(first))?;
        }
        if let Some(last) = patch.lastname {
            user.lastname = require("lastname", Some(last))?;
        }
        if let Some(department) = patch.department {
            user.department = clean(Some(department));
        }
        if let Some(extra) = patch.extra {
            if !user.extra.is_object() {
                user.extra = serde_json::Value::Object(serde_json::Map::new());
            }
            if let Some(doc) = user.extra.as_object_mut() {
                for (key, value) in extra {
                    if value.is_null() {
                        doc.remove(&key);
                    } else {
                        doc.insert(key, value);
                    }
                }
            }
        }
        user.updated_at = now();

        if SqliteRepo::update_profile(conn, &user)? == 0 {
            return Err(TaskflowError::UserNotFound {
                referenceid: referenceid.to_string(),
            }
            .into());
        }
        cache_evict(cache, [keys::user(referenceid)]);
        Ok(user.profile())
    })
}

/// Register a user with a hashed password.
///
/// ## Errors
///
/// - `MissingField`: any identity field, the password or the role absent
/// - `InvalidInput`: malformed e-mail or weak password
/// - `Conflict`: e-mail or `referenceid` already registered
pub fn create_user(conn: &Connection, input: NewUser) -> Result<UserProfile> {
    let subject = input.referenceid.clone().unwrap_or_default();
    observed("create_user", &subject, || {
        let referenceid = require("referenceid", input.referenceid)?;
        let email = normalize_email("email", &require("email", input.email)?)?;
        let firstname = require("firstname", input.firstname)?;
        let lastname = require("lastname", input.lastname)?;
        let role = input.role.ok_or_else(|| TaskflowError::MissingField {
            field: "role".to_string(),
        })?;
        let password = input.password.ok_or_else(|| TaskflowError::MissingField {
            field: "password".to_string(),
        })?;
        credentials::check_strength(password.expose())?;

        if SqliteRepo::email_exists(conn, &email)? {
            return Err(TaskflowError::EmailAlreadyRegistered { email }.into());
        }
        if SqliteRepo::get_user(conn, &referenceid)?.is_some() {
            return Err(TaskflowError::ReferenceIdAlreadyRegistered { referenceid }.into());
        }

        let ts = now();
        let user = User {
            id: new_id(),
            referenceid,
            email,
            firstname,
            lastname,
            password_hash: credentials::hash_password(&password)?,
            role,
            tsm: clean(input.tsm),
            manager: clean(input.manager),
            department: clean(input.department),
            status: UserStatus::Active,
            login_attempts: 0,
            locked_until: None,
            extra: input
                .extra
                .filter(|v| v.is_object())
                .unwrap_or_else(|| serde_json::json!({})),
            created_at: ts,
            updated_at: ts,
        };
        SqliteRepo::insert_user(conn, &user)?;
        Ok(user.profile())
    })
}
