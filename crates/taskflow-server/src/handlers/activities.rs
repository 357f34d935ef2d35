use axum::extract::{Path, State};
use serde::Deserialize;
use taskflow_core::model::NewActivity;
use taskflow_engine::commands::activities;

use crate::extract::{JsonBody, QueryParams};
use crate::response::{self, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub referenceid: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusBody {
    pub status: Option<String>,
}

pub async fn list_activities(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ActivityQuery>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| {
            activities::list_activities(
                conn,
                query.referenceid.as_deref(),
                query.from.as_deref(),
                query.to.as_deref(),
            )
        })
        .await?;
    Ok(response::list(rows))
}

pub async fn create_activity(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewActivity>,
) -> ApiResult {
    let activity = state
        .db
        .call(move |conn| activities::create_activity(conn, input))
        .await?;
    Ok(response::created(activity))
}

pub async fn update_activity_status(
    State(state): State<AppState>,
    Path(arn): Path<String>,
    JsonBody(body): JsonBody<StatusBody>,
) -> ApiResult {
    let activity = state
        .db
        .call(move |conn| activities::update_activity_status(conn, &arn, body.status.as_deref()))
        .await?;
    Ok(response::ok(activity))
}

pub async fn delete_activity(State(state): State<AppState>, Path(arn): Path<String>) -> ApiResult {
    state
        .db
        .call(move |conn| activities::delete_activity(conn, &arn))
        .await?;
    Ok(response::ok(serde_json::Value::Null))
}
