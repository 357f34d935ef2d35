use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::json;
use taskflow_core::model::{AccountPatch, NewAccount};
use taskflow_engine::commands::accounts;

use crate::extract::{JsonBody, QueryParams};
use crate::response::{self, ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AccountListQuery {
    pub referenceid: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DuplicateQuery {
    pub company_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdsBody {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransferBody {
    #[serde(default)]
    pub ids: Vec<String>,
    pub transfer_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    #[serde(default)]
    pub id: String,
    #[serde(default = "approve_by_default")]
    pub approve: bool,
}

fn approve_by_default() -> bool {
    true
}

pub async fn list_accounts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AccountListQuery>,
) -> ApiResult {
    let cache = state.cache.clone();
    let ttl = state.settings.cache_ttl;
    let rows = state
        .db
        .call(move |conn| {
            accounts::list_accounts(
                conn,
                cache.as_ref(),
                ttl,
                query.referenceid.as_deref(),
                query.status.as_deref(),
            )
        })
        .await?;
    Ok(response::list(rows))
}

pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewAccount>,
) -> ApiResult {
    let cache = state.cache.clone();
    let account = state
        .db
        .call(move |conn| accounts::create_account(conn, cache.as_ref(), input))
        .await?;
    Ok(response::created(account))
}

pub async fn get_account(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let account = state
        .db
        .call(move |conn| accounts::get_account(conn, &id))
        .await?;
    Ok(response::ok(account))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<AccountPatch>,
) -> ApiResult {
    let cache = state.cache.clone();
    let account = state
        .db
        .call(move |conn| accounts::update_account(conn, cache.as_ref(), &id, patch))
        .await?;
    Ok(response::ok(account))
}

pub async fn check_duplicate(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DuplicateQuery>,
) -> ApiResult {
    let matches = state
        .db
        .call(move |conn| accounts::check_duplicate(conn, query.company_name.as_deref()))
        .await
        .map_err(|e| ApiError::from(e).with("exists", json!(false)))?;
    let exists = !matches.is_empty();
    Ok(response::ok_with(matches, json!({ "exists": exists })))
}

pub async fn bulk_remove(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<IdsBody>,
) -> ApiResult {
    let cache = state.cache.clone();
    let removed = state
        .db
        .call(move |conn| accounts::bulk_remove_accounts(conn, cache.as_ref(), &body.ids))
        .await?;
    Ok(response::ok_with(json!({ "removed": removed }), json!({ "count": removed })))
}

pub async fn request_transfer(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TransferBody>,
) -> ApiResult {
    let cache = state.cache.clone();
    let marked = state
        .db
        .call(move |conn| {
            accounts::request_transfer(
                conn,
                cache.as_ref(),
                &body.ids,
                body.transfer_to.as_deref(),
            )
        })
        .await?;
    Ok(response::ok_with(json!({ "pending": marked }), json!({ "count": marked })))
}

pub async fn approve_transfer(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ApproveBody>,
) -> ApiResult {
    let cache = state.cache.clone();
    let account = state
        .db
        .call(move |conn| accounts::approve_transfer(conn, cache.as_ref(), &body.id, body.approve))
        .await?;
    Ok(response::ok(account))
}
