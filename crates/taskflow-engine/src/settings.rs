use std::time::Duration;

use taskflow_core::rules::lockout::LockoutPolicy;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_PASSWORD_RESET_TTL_MINUTES: i64 = 60;

/// Tunables shared by every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub cache_ttl: Duration,
    pub lockout: LockoutPolicy,
    pub password_reset_ttl: chrono::Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            lockout: LockoutPolicy::default(),
            password_reset_ttl: chrono::Duration::minutes(DEFAULT_PASSWORD_RESET_TTL_MINUTES),
        }
    }
}
