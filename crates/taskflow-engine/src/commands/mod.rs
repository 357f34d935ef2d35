//! Operation handlers, grouped by resource
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for every operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod accounts;
pub mod activities;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod history;
pub mod quotations;
pub mod tickets;
pub mod users;

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use taskflow_core::errors::TfError;
use taskflow_core::{log_op_end, log_op_error, log_op_start};
use taskflow_store::cache::Cache;
use taskflow_store::Result;

/// Run `f` between a start event and exactly one end or end_error event.
pub(crate) fn observed<T>(
    op: &'static str,
    subject: &str,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    log_op_start!(op, subject = subject);
    let start = Instant::now();

    match f() {
        Ok(value) => {
            log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
            Ok(value)
        }
        Err(err) => {
            let err = if err.op().is_none() { err.with_op(op) } else { err };
            log_op_error!(
                op,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Cache-aside read; any cache fault or undecodable entry is a miss.
pub(crate) fn cache_read<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    match cache.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding undecodable cache entry");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log_cache_fault(key, &e);
            None
        }
    }
}

pub(crate) fn cache_write<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration) {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!(key, error = %e, "value not cached");
            return;
        }
    };
    if let Err(e) = cache.set(key, &encoded, ttl) {
        log_cache_fault(key, &e);
    }
}

pub(crate) fn cache_evict<I, K>(cache: &dyn Cache, keys: I)
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    for key in keys {
        if let Err(e) = cache.delete(key.as_ref()) {
            log_cache_fault(key.as_ref(), &e);
        }
    }
}

fn log_cache_fault(key: &str, err: &TfError) {
    tracing::warn!(key, err_code = err.code(), error = %err, "cache unavailable");
}

/// A fresh time-ordered record id
pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
