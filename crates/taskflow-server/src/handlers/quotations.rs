use axum::extract::{Path, State};
use serde::Deserialize;
use taskflow_core::errors::{TfError, TfErrorKind};
use taskflow_core::model::QuotationUpdate;
use taskflow_engine::commands::quotations;

use crate::extract::{JsonBody, QueryParams};
use crate::response::{self, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RevisionQuery {
    pub activity_reference_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
    pub prefix: Option<String>,
    pub referenceid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReserveBody {
    pub quotation_number: Option<String>,
    pub referenceid: Option<String>,
}

pub async fn update_quotation(
    State(state): State<AppState>,
    Path(history_id): Path<String>,
    JsonBody(update): JsonBody<QuotationUpdate>,
) -> ApiResult {
    let history_id: i64 = history_id.trim().parse().map_err(|_| {
        TfError::new(TfErrorKind::InvalidInput)
            .with_field("history_id")
            .with_message(format!("history id `{history_id}` is not a number"))
    })?;
    let edit = state
        .db
        .call(move |conn| quotations::update_quotation(conn, history_id, update))
        .await?;
    Ok(response::ok(edit))
}

pub async fn list_revisions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<RevisionQuery>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| {
            quotations::list_revisions(conn, query.activity_reference_number.as_deref())
        })
        .await?;
    Ok(response::list(rows))
}

pub async fn generate_number(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<GenerateBody>,
) -> ApiResult {
    let number = state
        .db
        .call(move |conn| {
            quotations::generate_quotation_number(
                conn,
                body.prefix.as_deref(),
                body.referenceid.as_deref(),
            )
        })
        .await?;
    Ok(response::created(number))
}

pub async fn reserve_number(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ReserveBody>,
) -> ApiResult {
    let number = state
        .db
        .call(move |conn| {
            quotations::reserve_quotation_number(
                conn,
                body.quotation_number.as_deref(),
                body.referenceid.as_deref(),
            )
        })
        .await?;
    Ok(response::ok(number))
}
