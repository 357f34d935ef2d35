use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskflow_core_types::Sensitive;

use super::string_enum;

/// Position in the sales hierarchy
///
/// Stored as the long display names; the short forms are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Tsa,
    Tsm,
    Manager,
    Admin,
}

string_enum!(Role, "role", {
    Tsa => "Territory Sales Associate" | "tsa",
    Tsm => "Territory Sales Manager" | "tsm",
    Manager => "Manager",
    Admin => "Admin" | "Super Admin",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserStatus {
    Active,
    Locked,
    Resigned,
    Terminated,
}

string_enum!(UserStatus, "user", {
    Active => "Active",
    Locked => "Locked",
    Resigned => "Resigned",
    Terminated => "Terminated",
});

impl UserStatus {
    /// Resigned and terminated users can never sign in.
    pub fn is_separated(&self) -> bool {
        matches!(self, UserStatus::Resigned | UserStatus::Terminated)
    }
}

/// Stored user document, including credential state
///
/// Not serializable: anything leaving the service goes through
/// [`User::profile`], which drops the password hash and lockout counters.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub referenceid: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password_hash: Sensitive<String>,
    pub role: Role,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub department: Option<String>,
    pub status: UserStatus,
    pub login_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    /// Free-form document fields (contact number, avatar url, ...)
    pub extra: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            referenceid: self.referenceid.clone(),
            email: self.email.clone(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            role: self.role,
            tsm: self.tsm.clone(),
            manager: self.manager.clone(),
            department: self.department.clone(),
            status: self.status,
            extra: self.extra.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub referenceid: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: Role,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub department: Option<String>,
    pub status: UserStatus,
    pub extra: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub referenceid: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub role: Option<Role>,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub department: Option<String>,
    pub extra: Option<serde_json::Value>,
}

/// Self-service profile edit; role, hierarchy and credentials are not
/// editable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub department: Option<String>,
    /// Merged key-by-key into the stored `extra` document
    pub extra: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.department.is_none()
            && self.extra.as_ref().map_or(true, |m| m.is_empty())
    }
}
