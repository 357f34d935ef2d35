//! Taskflow Core - domain model and business rules
//!
//! Everything here is pure: no database, no network. The store and
//! engine crates build on these types.
//!
//! - `model`: records and request payloads for every table
//! - `rules`: validation, duplicate matching, numbering, lockout, scoping
//! - `credentials`: password hashing and reset tokens
//! - `errors`: structured error facility
//! - `logging_facility`: tracing initialization and operation macros

pub mod credentials;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Referenced by the exported logging macros
pub use taskflow_core_types;

pub use errors::{Result, TaskflowError, TfError, TfErrorKind};
