//! Taskflow HTTP surface
//!
//! `axum` router over the engine operations. Every response uses the
//! `{success, data | error, code}` envelope; see [`response`].
//!
//! ## Modules
//!
//! - `config`: layered settings (defaults, `taskflow.toml`, `TASKFLOW_*`)
//! - `state`: shared database handle, cache and tunables
//! - `routes`: endpoint table
//! - `handlers`: one async handler per operation
//! - `middleware`: request ids and envelope fallbacks

pub mod config;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use config::Settings;
pub use routes::build_router;
pub use state::AppState;
