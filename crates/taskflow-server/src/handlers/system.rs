//! Health, dashboard and audit-trail reads

use axum::extract::State;
use serde::Deserialize;
use taskflow_engine::commands::{audit, dashboard};

use super::OwnerQuery;
use crate::extract::QueryParams;
use crate::response::{self, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> ApiResult {
    let status = state.db.call(|conn| dashboard::health(conn)).await?;
    Ok(response::ok(status))
}

pub async fn dashboard_summary(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ApiResult {
    let summary = state
        .db
        .call(move |conn| dashboard::dashboard_summary(conn, query.referenceid.as_deref()))
        .await?;
    Ok(response::ok(summary))
}

pub async fn task_logs(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| audit::list_task_logs(conn, query.referenceid.as_deref()))
        .await?;
    Ok(response::list(rows))
}

pub async fn security_alerts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<EmailQuery>,
) -> ApiResult {
    let rows = state
        .db
        .call(move |conn| audit::list_security_alerts(conn, query.email.as_deref()))
        .await?;
    Ok(response::list(rows))
}
