use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One progress entry against an activity: a call, a quotation or a
/// sales order. Quotation fields are the ones that get revised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub id: i64,
    pub activity_reference_number: String,
    pub referenceid: String,
    pub type_activity: String,
    pub call_status: Option<String>,
    pub quotation_number: Option<String>,
    pub quotation_amount: Option<f64>,
    pub quotation_status: Option<String>,
    pub so_number: Option<String>,
    pub so_amount: Option<f64>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHistory {
    pub activity_reference_number: Option<String>,
    pub referenceid: Option<String>,
    pub type_activity: Option<String>,
    pub call_status: Option<String>,
    pub quotation_number: Option<String>,
    pub quotation_amount: Option<f64>,
    pub quotation_status: Option<String>,
    pub so_number: Option<String>,
    pub so_amount: Option<f64>,
    pub remarks: Option<String>,
}

/// Edit of the quotation fields of a history row
///
/// With `create_revision` set, the prior values are snapshotted into
/// `revised_quotations` before the edit is applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationUpdate {
    pub quotation_number: Option<String>,
    pub quotation_amount: Option<f64>,
    pub quotation_status: Option<String>,
    pub so_number: Option<String>,
    pub so_amount: Option<f64>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub create_revision: bool,
    pub revised_by: Option<String>,
}

impl QuotationUpdate {
    pub fn has_changes(&self) -> bool {
        self.quotation_number.is_some()
            || self.quotation_amount.is_some()
            || self.quotation_status.is_some()
            || self.so_number.is_some()
            || self.so_amount.is_some()
            || self.remarks.is_some()
    }

    /// Apply onto a copy of `current`, returning the row as it will be stored.
    pub fn apply_to(&self, current: &History) -> History {
        let mut next = current.clone();
        if let Some(v) = &self.quotation_number {
            next.quotation_number = Some(v.clone());
        }
        if let Some(v) = self.quotation_amount {
            next.quotation_amount = Some(v);
        }
        if let Some(v) = &self.quotation_status {
            next.quotation_status = Some(v.clone());
        }
        if let Some(v) = &self.so_number {
            next.so_number = Some(v.clone());
        }
        if let Some(v) = self.so_amount {
            next.so_amount = Some(v);
        }
        if let Some(v) = &self.remarks {
            next.remarks = Some(v.clone());
        }
        next.updated_at = Utc::now();
        next
    }
}
