use axum::extract::State;
use serde::Deserialize;
use serde_json::json;
use taskflow_core_types::Sensitive;
use taskflow_engine::commands::auth;

use super::OwnerQuery;
use crate::extract::JsonBody;
use crate::response::{self, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<Sensitive<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequestBody {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetConfirmBody {
    pub token: Option<Sensitive<String>>,
    pub password: Option<Sensitive<String>>,
}

pub async fn login(State(state): State<AppState>, JsonBody(body): JsonBody<LoginBody>) -> ApiResult {
    let cache = state.cache.clone();
    let policy = state.settings.lockout;
    let profile = state
        .db
        .call(move |conn| {
            auth::login(
                conn,
                cache.as_ref(),
                &policy,
                body.email.as_deref(),
                body.password.as_ref(),
            )
        })
        .await?;
    Ok(response::ok(profile))
}

pub async fn logout(State(state): State<AppState>, JsonBody(body): JsonBody<OwnerQuery>) -> ApiResult {
    let entry = state
        .db
        .call(move |conn| auth::logout(conn, body.referenceid.as_deref()))
        .await?;
    Ok(response::ok(entry))
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResetRequestBody>,
) -> ApiResult {
    let ttl = state.settings.password_reset_ttl;
    let ticket = state
        .db
        .call(move |conn| auth::request_password_reset(conn, ttl, body.email.as_deref()))
        .await?;
    Ok(response::ok_with(
        ticket,
        json!({ "message": "If the address is registered, a reset token has been issued" }),
    ))
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResetConfirmBody>,
) -> ApiResult {
    let cache = state.cache.clone();
    state
        .db
        .call(move |conn| {
            auth::confirm_password_reset(
                conn,
                cache.as_ref(),
                body.token.as_ref(),
                body.password.as_ref(),
            )
        })
        .await?;
    Ok(response::ok(serde_json::Value::Null))
}
