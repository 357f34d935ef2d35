use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

string_enum!(ActivityStatus, "activity", {
    Scheduled => "Scheduled",
    InProgress => "In Progress" | "in_progress" | "ongoing",
    Completed => "Completed" | "done",
    Cancelled => "Cancelled" | "canceled",
});

/// A planned or performed sales touch-point against one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub activity_reference_number: String,
    pub account_reference_number: String,
    pub referenceid: String,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub company_name: String,
    pub type_client: Option<String>,
    pub status: ActivityStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewActivity {
    pub account_reference_number: Option<String>,
    pub referenceid: Option<String>,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub company_name: Option<String>,
    pub type_client: Option<String>,
    pub status: Option<ActivityStatus>,
    pub scheduled_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}
