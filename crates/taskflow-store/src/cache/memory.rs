use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::Cache;
use crate::errors::{cache_error, Result};

/// Map size above which `set` sweeps out expired entries
const PRUNE_THRESHOLD: usize = 1024;

/// In-process cache; the default when no Redis URL is configured
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries held, expired or not
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| cache_error("cache_get", e))?;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| cache_error("cache_set", e))?;
        let now = Instant::now();
        if entries.len() >= PRUNE_THRESHOLD {
            entries.retain(|_, (_, expires_at)| *expires_at > now);
        }
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| cache_error("cache_delete", e))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
        cache.delete("k").unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
    }

    #[test]
    fn test_expired_entries_are_misses() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::ZERO).unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
    }

    #[test]
    fn test_expired_entries_are_swept_on_set() {
        let cache = MemoryCache::new();
        for i in 0..PRUNE_THRESHOLD {
            cache.set(&format!("stale:{i}"), "v", Duration::ZERO).unwrap();
        }
        assert_eq!(cache.len(), PRUNE_THRESHOLD);

        cache.set("fresh", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh").unwrap().as_deref(), Some("v"));
    }
}
