//! Key-value cache used for cache-aside reads
//!
//! The cache is never a source of truth: callers treat every error as a
//! miss and fall back to the store.

mod memory;
mod redis_cache;

use std::time::Duration;

use taskflow_core::model::AccountStatus;

use crate::errors::Result;

pub use memory::MemoryCache;
pub use redis_cache::{RedisCache, DEFAULT_REDIS_TIMEOUT};

/// String-valued cache with per-entry expiry
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;
}

/// Key layout
pub mod keys {
    use super::AccountStatus;

    const ACCOUNT_STATUSES: [AccountStatus; 4] = [
        AccountStatus::Active,
        AccountStatus::Inactive,
        AccountStatus::PendingTransfer,
        AccountStatus::Removed,
    ];

    /// `accounts:<referenceid>:<status|all>`
    pub fn accounts(referenceid: &str, status: Option<AccountStatus>) -> String {
        match status {
            Some(s) => format!("accounts:{}:{}", referenceid, s.as_str()),
            None => format!("accounts:{}:all", referenceid),
        }
    }

    /// Every account-list key for one owner
    pub fn all_account_lists(referenceid: &str) -> Vec<String> {
        std::iter::once(accounts(referenceid, None))
            .chain(ACCOUNT_STATUSES.iter().map(|s| accounts(referenceid, Some(*s))))
            .collect()
    }

    /// `user:<referenceid>`
    pub fn user(referenceid: &str) -> String {
        format!("user:{}", referenceid)
    }

}
