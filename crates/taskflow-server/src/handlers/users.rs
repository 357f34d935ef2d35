use axum::extract::{Path, State};
use taskflow_core::model::{NewUser, ProfilePatch};
use taskflow_engine::commands::users;

use super::OwnerQuery;
use crate::extract::{JsonBody, QueryParams};
use crate::response::{self, ApiResult};
use crate::state::AppState;

pub async fn get_me(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ApiResult {
    let cache = state.cache.clone();
    let ttl = state.settings.cache_ttl;
    let profile = state
        .db
        .call(move |conn| users::get_user(conn, cache.as_ref(), ttl, query.referenceid.as_deref()))
        .await?;
    Ok(response::ok(profile))
}

pub async fn list_team(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ApiResult {
    let team = state
        .db
        .call(move |conn| users::list_team(conn, query.referenceid.as_deref()))
        .await?;
    Ok(response::list(team))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(referenceid): Path<String>,
    JsonBody(patch): JsonBody<ProfilePatch>,
) -> ApiResult {
    let cache = state.cache.clone();
    let profile = state
        .db
        .call(move |conn| users::update_profile(conn, cache.as_ref(), &referenceid, patch))
        .await?;
    Ok(response::ok(profile))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewUser>,
) -> ApiResult {
    let profile = state
        .db
        .call(move |conn| users::create_user(conn, input))
        .await?;
    Ok(response::created(profile))
}
