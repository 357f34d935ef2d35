//! Taskflow Store - SQLite persistence and key-value cache
//!
//! Provides:
//! - Connection management and embedded, checksummed migrations
//! - `SqliteRepo`: one group of statements per table
//! - `Cache`: cache-aside backend trait with in-memory and Redis implementations

pub mod cache;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteRepo;
