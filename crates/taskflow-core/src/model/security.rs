use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ALERT_ACCOUNT_LOCKED: &str = "account_locked";
pub const ALERT_PASSWORD_RESET: &str = "password_reset";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: i64,
    pub email: String,
    pub referenceid: Option<String>,
    pub alert_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Stored password-reset request; only the token digest is kept
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordReset {
    pub id: i64,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}
