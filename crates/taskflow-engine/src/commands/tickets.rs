use rusqlite::Connection;
use taskflow_core::model::{NewTicket, Ticket, TicketStatus};
use taskflow_core::rules::numbering;
use taskflow_core::rules::validation::{clean, require, require_str};
use taskflow_core::TaskflowError;
use taskflow_store::repo::now;
use taskflow_store::{Result, SqliteRepo};

use super::{new_id, observed};

/// ## Errors
///
/// - `MissingField`: `referenceid` absent
pub fn list_tickets(conn: &Connection, referenceid: Option<&str>) -> Result<Vec<Ticket>> {
    observed("list_tickets", referenceid.unwrap_or_default(), || {
        let referenceid = require_str("referenceid", referenceid)?;
        SqliteRepo::list_tickets(conn, referenceid)
    })
}

/// Endorse a customer concern to a TSA.
///
/// ## Errors
///
/// - `MissingField`: company, concern, endorser or assignee absent
pub fn endorse_ticket(conn: &Connection, input: NewTicket) -> Result<Ticket> {
    let subject = input.referenceid.clone().unwrap_or_default();
    observed("endorse_ticket", &subject, || {
        let company_name = require("company_name", input.company_name)?;
        let ts = now();
        let ticket = Ticket {
            id: new_id(),
            ticket_reference_number: numbering::reference_number("TKT", &company_name),
            company_name,
            contact_person: clean(input.contact_person),
            contact_number: clean(input.contact_number),
            concern: require("concern", input.concern)?,
            endorsed_by: require("endorsed_by", input.endorsed_by)?,
            referenceid: require("referenceid", input.referenceid)?,
            tsm: clean(input.tsm),
            status: TicketStatus::Endorsed,
            remarks: clean(input.remarks),
            created_at: ts,
            updated_at: ts,
        };
        SqliteRepo::insert_ticket(conn, &ticket)?;
        Ok(ticket)
    })
}

/// Move a ticket forward (Endorsed → Received → Closed).
///
/// ## Errors
///
/// - `MissingField` / `InvalidInput`: status absent, unknown, or a
///   backwards move
/// - `NotFound`: unknown ticket, or its status changed concurrently
pub fn update_ticket_status(
    conn: &Connection,
    ticket_reference_number: &str,
    status: Option<&str>,
    remarks: Option<&str>,
) -> Result<Ticket> {
    observed("update_ticket_status", ticket_reference_number, || {
        let next: TicketStatus = require_str("status", status)?.parse()?;
        let not_found = || TaskflowError::TicketNotFound {
            ticket_reference_number: ticket_reference_number.to_string(),
        };

        let current = SqliteRepo::get_ticket(conn, ticket_reference_number)?.ok_or_else(not_found)?;
        if !current.status.can_transition_to(next) {
            return Err(TaskflowError::InvalidField {
                field: "status".to_string(),
                reason: format!("cannot move a ticket from {} to {}", current.status, next),
            }
            .into());
        }

        let remarks = remarks.map(str::trim).filter(|r| !r.is_empty());
        let rows = SqliteRepo::update_ticket_status(
            conn,
            ticket_reference_number,
            current.status,
            next,
            remarks,
        )?;
        if rows == 0 {
            return Err(TaskflowError::NoRowsAffected {
                entity: "ticket".to_string(),
                id: ticket_reference_number.to_string(),
            }
            .into());
        }
        Ok(SqliteRepo::get_ticket(conn, ticket_reference_number)?.ok_or_else(not_found)?)
    })
}
