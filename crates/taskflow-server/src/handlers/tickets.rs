use axum::extract::{Path, State};
use serde::Deserialize;
use taskflow_core::model::NewTicket;
use taskflow_engine::commands::tickets;

use super::OwnerQuery;
use crate::extract::{JsonBody, QueryParams};
use crate::response::{self, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TicketStatusBody {
    pub status: Option<String>,
    pub remarks: Option<String>,
}

pub async fn list_tickets(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| tickets::list_tickets(conn, query.referenceid.as_deref()))
        .await?;
    Ok(response::list(rows))
}

pub async fn endorse_ticket(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewTicket>,
) -> ApiResult {
    let ticket = state
        .db
        .call(move |conn| tickets::endorse_ticket(conn, input))
        .await?;
    Ok(response::created(ticket))
}

pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    JsonBody(body): JsonBody<TicketStatusBody>,
) -> ApiResult {
    let ticket = state
        .db
        .call(move |conn| {
            tickets::update_ticket_status(
                conn,
                &reference,
                body.status.as_deref(),
                body.remarks.as_deref(),
            )
        })
        .await?;
    Ok(response::ok(ticket))
}
