use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskLogStatus {
    Login,
    Logout,
}

string_enum!(TaskLogStatus, "task log", {
    Login => "Login",
    Logout => "Logout",
});

/// Session attendance entry written on login and logout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: i64,
    pub referenceid: String,
    pub email: String,
    pub status: TaskLogStatus,
    pub created_at: DateTime<Utc>,
}
