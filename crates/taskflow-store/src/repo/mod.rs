//! Repository layer: one group of statements per table
//!
//! Every method takes a `&Connection`, so callers that need atomicity pass
//! a `Transaction` (which derefs to `Connection`). Writes return the number
//! of rows affected; zero-row handling is the caller's decision.

mod account;
mod activity;
mod history;
mod quotation;
mod rows;
mod security;
mod ticket;
mod user;

pub use account::StatusCount;
pub use rows::now;

/// SQLite repository for all Taskflow tables
pub struct SqliteRepo;
