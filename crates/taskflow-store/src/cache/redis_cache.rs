use std::time::Duration;

use super::Cache;
use crate::errors::{cache_error, Result};

/// Bound on connect, read and write when none is configured
pub const DEFAULT_REDIS_TIMEOUT: Duration = Duration::from_millis(250);

/// Redis-backed cache using the synchronous client
///
/// A connection is taken per call. Cache calls run while the database
/// handle is held, so every socket operation is bounded by `timeout`; an
/// unreachable server turns into a quick cache fault instead of a stall.
pub struct RedisCache {
    client: redis::Client,
    timeout: Duration,
}

impl RedisCache {
    /// Validate the URL. No connection is made until first use.
    pub fn open(url: &str) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_REDIS_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| cache_error("cache_open", e))?;
        // A zero duration means "no timeout" to the socket calls.
        let timeout = timeout.max(Duration::from_millis(1));
        Ok(Self { client, timeout })
    }

    fn connection(&self, op: &str) -> Result<redis::Connection> {
        let conn = self
            .client
            .get_connection_with_timeout(self.timeout)
            .map_err(|e| cache_error(op, e))?;
        conn.set_read_timeout(Some(self.timeout))
            .map_err(|e| cache_error(op, e))?;
        conn.set_write_timeout(Some(self.timeout))
            .map_err(|e| cache_error(op, e))?;
        Ok(conn)
    }
}

impl Cache for RedisCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection("cache_get")?;
        redis::cmd("GET")
            .arg(key)
            .query(&mut conn)
            .map_err(|e| cache_error("cache_get", e))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection("cache_set")?;
        // Redis rejects EX 0
        let secs = ttl.as_secs().max(1);
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(secs)
            .query::<()>(&mut conn)
            .map_err(|e| cache_error("cache_set", e))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection("cache_delete")?;
        redis::cmd("DEL")
            .arg(key)
            .query::<i64>(&mut conn)
            .map(|_| ())
            .map_err(|e| cache_error("cache_delete", e))
    }
}
