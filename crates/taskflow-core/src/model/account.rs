use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::string_enum;

/// Lifecycle of a customer account
///
/// `Removed` is a soft delete: the row stays for audit and duplicate
/// checks skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    Active,
    Inactive,
    PendingTransfer,
    Removed,
}

string_enum!(AccountStatus, "account", {
    Active => "Active",
    Inactive => "Inactive",
    PendingTransfer => "Pending Transfer" | "pending_transfer",
    Removed => "Removed",
});

/// A customer company owned by one TSA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub account_reference_number: String,
    /// Owning TSA
    pub referenceid: String,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email_address: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub industry: Option<String>,
    pub type_client: Option<String>,
    pub status: AccountStatus,
    /// Target TSA while a transfer awaits approval
    pub transfer_to: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    pub referenceid: Option<String>,
    pub tsm: Option<String>,
    pub manager: Option<String>,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email_address: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub industry: Option<String>,
    pub type_client: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Partial update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email_address: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub industry: Option<String>,
    pub type_client: Option<String>,
    pub status: Option<AccountStatus>,
    pub remarks: Option<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.contact_person.is_none()
            && self.contact_number.is_none()
            && self.email_address.is_none()
            && self.address.is_none()
            && self.region.is_none()
            && self.industry.is_none()
            && self.type_client.is_none()
            && self.status.is_none()
            && self.remarks.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_display_strings() {
        let parsed: AccountStatus = "pending transfer".parse().unwrap();
        assert_eq!(parsed, AccountStatus::PendingTransfer);
        assert_eq!(parsed.to_string(), "Pending Transfer");
        assert!("archived".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(AccountPatch::default().is_empty());
        let patch = AccountPatch {
            remarks: Some("called twice".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
