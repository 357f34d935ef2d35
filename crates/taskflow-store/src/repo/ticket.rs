use rusqlite::{params, Connection, OptionalExtension, Row};
use taskflow_core::model::{Ticket, TicketStatus};
use taskflow_core::rules::scope::Scope;

use super::account::{collect_status_counts, StatusCount};
use super::rows::{parsed, timestamp};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, Result};

const TICKET_COLUMNS: &str = "id, ticket_reference_number, company_name, contact_person, \
     contact_number, concern, endorsed_by, referenceid, tsm, status, remarks, created_at, \
     updated_at";

fn map_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get("id")?,
        ticket_reference_number: row.get("ticket_reference_number")?,
        company_name: row.get("company_name")?,
        contact_person: row.get("contact_person")?,
        contact_number: row.get("contact_number")?,
        concern: row.get("concern")?,
        endorsed_by: row.get("endorsed_by")?,
        referenceid: row.get("referenceid")?,
        tsm: row.get("tsm")?,
        status: parsed(row, "status")?,
        remarks: row.get("remarks")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

impl SqliteRepo {
    pub fn insert_ticket(conn: &Connection, ticket: &Ticket) -> Result<()> {
        conn.execute(
            "INSERT INTO endorsed_tickets (id, ticket_reference_number, company_name,
                contact_person, contact_number, concern, endorsed_by, referenceid, tsm, status,
                remarks, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                ticket.id,
                ticket.ticket_reference_number,
                ticket.company_name,
                ticket.contact_person,
                ticket.contact_number,
                ticket.concern,
                ticket.endorsed_by,
                ticket.referenceid,
                ticket.tsm,
                ticket.status.as_str(),
                ticket.remarks,
                ticket.created_at.timestamp(),
                ticket.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_ticket(conn: &Connection, ticket_reference_number: &str) -> Result<Option<Ticket>> {
        conn.query_row(
            &format!(
                "SELECT {TICKET_COLUMNS} FROM endorsed_tickets WHERE ticket_reference_number = ?1"
            ),
            [ticket_reference_number],
            map_ticket,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Tickets assigned to one TSA, newest first.
    pub fn list_tickets(conn: &Connection, referenceid: &str) -> Result<Vec<Ticket>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM endorsed_tickets WHERE referenceid = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([referenceid], map_ticket)
            .map_err(from_rusqlite)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)
    }

    /// Move a ticket from `from` to `to`; matches nothing if another writer
    /// changed the status first.
    pub fn update_ticket_status(
        conn: &Connection,
        ticket_reference_number: &str,
        from: TicketStatus,
        to: TicketStatus,
        remarks: Option<&str>,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE endorsed_tickets SET status = ?3, remarks = COALESCE(?4, remarks),
                updated_at = ?5
             WHERE ticket_reference_number = ?1 AND status = ?2",
            params![
                ticket_reference_number,
                from.as_str(),
                to.as_str(),
                remarks,
                super::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Tickets carry no `manager` column, so a manager scope counts every
    /// ticket whose TSM reports to that manager.
    pub fn count_tickets_by_status(conn: &Connection, scope: &Scope) -> Result<Vec<StatusCount>> {
        match scope {
            Scope::Manager(manager) => collect_status_counts(
                conn,
                "SELECT status, COUNT(*) FROM endorsed_tickets
                 WHERE tsm IN (SELECT referenceid FROM users WHERE manager = ?)
                    OR referenceid IN (SELECT referenceid FROM users WHERE manager = ?)
                 GROUP BY status ORDER BY status",
                &[manager.clone(), manager.clone()],
            ),
            other => {
                let (clause, args) = super::account::scope_clause(other);
                collect_status_counts(
                    conn,
                    &format!(
                        "SELECT status, COUNT(*) FROM endorsed_tickets {clause}
                         GROUP BY status ORDER BY status"
                    ),
                    &args,
                )
            }
        }
    }
}
