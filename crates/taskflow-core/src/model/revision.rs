use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a quotation's values taken before an edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub id: i64,
    pub history_id: i64,
    pub activity_reference_number: String,
    /// `Revised-Quotation-<NNN>-<original-number>`
    pub revision_label: String,
    pub quotation_number: Option<String>,
    pub quotation_amount: Option<f64>,
    pub quotation_status: Option<String>,
    pub remarks: Option<String>,
    pub revised_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
