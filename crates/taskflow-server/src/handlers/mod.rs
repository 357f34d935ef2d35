//! HTTP handlers, one per operation
//!
//! Handlers only extract, call the engine through [`crate::state::Db`]
//! and wrap the result; validation belongs to the engine.

pub mod accounts;
pub mod activities;
pub mod auth;
pub mod history;
pub mod quotations;
pub mod system;
pub mod tickets;
pub mod users;

use serde::Deserialize;

/// `?referenceid=` on owner-scoped reads
#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    pub referenceid: Option<String>,
}
