//! Layered server configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `taskflow.toml` (or the file named by `TASKFLOW_CONFIG`), then
//! `TASKFLOW_*` environment variables with `__` separating nested keys
//! (`TASKFLOW_LOCKOUT__MAX_ATTEMPTS=3`). A `.env` file is loaded into the
//! environment before any of this runs.

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use taskflow_core::errors::{TfError, TfErrorKind};
use taskflow_core::logging_facility::Profile;
use taskflow_core::rules::lockout::LockoutPolicy;
use taskflow_engine::settings::{DEFAULT_CACHE_TTL_SECS, DEFAULT_PASSWORD_RESET_TTL_MINUTES};
use taskflow_engine::EngineSettings;
use taskflow_store::cache::DEFAULT_REDIS_TIMEOUT;

const DEFAULT_CONFIG_FILE: &str = "taskflow";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockoutSettings {
    pub max_attempts: u32,
    pub lock_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub database_path: String,
    /// Absent means the in-process cache
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    /// Connect, read and write bound for each Redis call
    pub redis_timeout_ms: u64,
    pub log_profile: String,
    pub lockout: LockoutSettings,
    pub password_reset_ttl_minutes: i64,
}

impl Settings {
    /// Load from the process environment and the default config file.
    ///
    /// # Errors
    ///
    /// `Config` when a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, TfError> {
        let _ = dotenvy::dotenv();
        let file = std::env::var("TASKFLOW_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::from_sources(&file, Environment::with_prefix("TASKFLOW"))
    }

    /// Build from one optional file and one environment source.
    ///
    /// # Errors
    ///
    /// `Config` when a source cannot be read or a value has the wrong type.
    pub fn from_sources(file: &str, env: Environment) -> Result<Self, TfError> {
        let defaults = LockoutPolicy::default();
        Config::builder()
            .set_default("bind_addr", "127.0.0.1:8080")
            .and_then(|b| b.set_default("database_path", "taskflow.db"))
            .and_then(|b| b.set_default("cache_ttl_secs", DEFAULT_CACHE_TTL_SECS))
            .and_then(|b| {
                b.set_default(
                    "redis_timeout_ms",
                    DEFAULT_REDIS_TIMEOUT.as_millis() as u64,
                )
            })
            .and_then(|b| b.set_default("log_profile", "development"))
            .and_then(|b| b.set_default("lockout.max_attempts", defaults.max_attempts))
            .and_then(|b| b.set_default("lockout.lock_minutes", defaults.lock_minutes))
            .and_then(|b| {
                b.set_default(
                    "password_reset_ttl_minutes",
                    DEFAULT_PASSWORD_RESET_TTL_MINUTES,
                )
            })
            .map_err(config_error)?
            .add_source(File::with_name(file).required(false))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// # Errors
    ///
    /// `Config` for an unknown profile name.
    pub fn profile(&self) -> Result<Profile, TfError> {
        self.log_profile.parse().map_err(|msg: String| {
            TfError::new(TfErrorKind::Config)
                .with_field("log_profile")
                .with_message(msg)
        })
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            lockout: LockoutPolicy {
                max_attempts: self.lockout.max_attempts,
                lock_minutes: self.lockout.lock_minutes,
            },
            password_reset_ttl: chrono::Duration::minutes(self.password_reset_ttl_minutes),
        }
    }
}

fn config_error(err: config::ConfigError) -> TfError {
    TfError::new(TfErrorKind::Config).with_message(err.to_string())
}
