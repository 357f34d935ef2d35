use axum::extract::{Path, State};
use taskflow_core::model::NewHistory;
use taskflow_engine::commands::history;

use super::OwnerQuery;
use crate::extract::{JsonBody, QueryParams};
use crate::response::{self, ApiResult};
use crate::state::AppState;

pub async fn list_history(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| history::list_history(conn, query.referenceid.as_deref()))
        .await?;
    Ok(response::list(rows))
}

pub async fn list_for_activity(
    State(state): State<AppState>,
    Path(arn): Path<String>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| history::list_history_for_activity(conn, &arn))
        .await?;
    Ok(response::list(rows))
}

pub async fn create_history(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewHistory>,
) -> ApiResult {
    let entry = state
        .db
        .call(move |conn| history::create_history(conn, input))
        .await?;
    Ok(response::created(entry))
}
