use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Endorsed,
    Received,
    Closed,
}

string_enum!(TicketStatus, "ticket", {
    Endorsed => "Endorsed",
    Received => "Received",
    Closed => "Closed",
});

impl TicketStatus {
    /// Tickets only move forward: Endorsed → Received → Closed.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Endorsed, TicketStatus::Received)
                | (TicketStatus::Endorsed, TicketStatus::Closed)
                | (TicketStatus::Received, TicketStatus::Closed)
        )
    }
}

/// A customer concern endorsed to a TSA for follow-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub ticket_reference_number: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub concern: String,
    pub endorsed_by: String,
    /// Assigned TSA
    pub referenceid: String,
    pub tsm: Option<String>,
    pub status: TicketStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTicket {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub concern: Option<String>,
    pub endorsed_by: Option<String>,
    pub referenceid: Option<String>,
    pub tsm: Option<String>,
    pub remarks: Option<String>,
}
