//! Taskflow Engine - operation layer
//!
//! One function per operation. Each validates its input with the core
//! rules, runs its statements through `SqliteRepo` (inside a transaction
//! where the operation needs one), keeps the cache coherent and owns the
//! operation's start/end log events.

pub mod commands;
pub mod settings;

pub use settings::EngineSettings;
