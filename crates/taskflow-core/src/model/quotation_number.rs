use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A quotation number minted for a prefix, claimable exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationNumber {
    pub quotation_number: String,
    pub prefix: String,
    pub sequence: i64,
    pub reserved: bool,
    pub reserved_by: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
