//! Response envelope and error-to-status mapping
//!
//! Success: `{"success": true, "data": ..., <extra fields>}`.
//! Failure: `{"success": false, "error": "<message>", "code": "ERR_..."}`,
//! plus `field` / `details` when the error carries them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};
use taskflow_core::errors::{TfError, TfErrorKind};

pub type ApiResult = Result<Response, ApiError>;

#[must_use]
pub fn status_for(kind: TfErrorKind) -> StatusCode {
    match kind {
        TfErrorKind::InvalidInput | TfErrorKind::MissingField => StatusCode::BAD_REQUEST,
        TfErrorKind::Unauthorised => StatusCode::UNAUTHORIZED,
        TfErrorKind::Forbidden => StatusCode::FORBIDDEN,
        TfErrorKind::NotFound => StatusCode::NOT_FOUND,
        TfErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        TfErrorKind::Conflict => StatusCode::CONFLICT,
        TfErrorKind::Locked => StatusCode::LOCKED,
        TfErrorKind::Persistence
        | TfErrorKind::Cache
        | TfErrorKind::Serialization
        | TfErrorKind::Config
        | TfErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Failure response wrapping a structured error
#[derive(Debug)]
pub struct ApiError {
    error: TfError,
    extra: Map<String, Value>,
}

impl ApiError {
    /// Add a top-level field to the failure body.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn error(&self) -> &TfError {
        &self.error
    }
}

impl From<TfError> for ApiError {
    fn from(error: TfError) -> Self {
        Self {
            error,
            extra: Map::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.error.kind());
        let message = if status.is_server_error() {
            // Store and cache messages stay in the logs
            "internal server error".to_string()
        } else if self.error.message().is_empty() {
            self.error.code().to_string()
        } else {
            self.error.message().to_string()
        };

        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert("error".into(), Value::String(message));
        body.insert("code".into(), Value::String(self.error.code().into()));
        if !status.is_server_error() {
            if let Some(field) = self.error.field() {
                body.insert("field".into(), Value::String(field.into()));
            }
            if let Some(details) = self.error.details() {
                body.insert("details".into(), details.clone());
            }
        }
        body.extend(self.extra);
        (status, Json(Value::Object(body))).into_response()
    }
}

fn envelope<T: Serialize>(status: StatusCode, data: T, extra: Map<String, Value>) -> Response {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    match serde_json::to_value(data) {
        Ok(value) => {
            body.insert("data".into(), value);
        }
        Err(e) => {
            tracing::error!(error = %e, "response body not serializable");
            return ApiError::from(
                TfError::new(TfErrorKind::Serialization).with_message(e.to_string()),
            )
            .into_response();
        }
    }
    body.extend(extra);
    (status, Json(Value::Object(body))).into_response()
}

pub fn ok<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::OK, data, Map::new())
}

pub fn created<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::CREATED, data, Map::new())
}

/// A collection, with its length as `count`
pub fn list<T: Serialize>(items: Vec<T>) -> Response {
    let mut extra = Map::new();
    extra.insert("count".into(), json!(items.len()));
    envelope(StatusCode::OK, items, extra)
}

/// Success with additional top-level fields
pub fn ok_with<T: Serialize>(data: T, extra: Value) -> Response {
    match extra {
        Value::Object(map) => envelope(StatusCode::OK, data, map),
        _ => envelope(StatusCode::OK, data, Map::new()),
    }
}
