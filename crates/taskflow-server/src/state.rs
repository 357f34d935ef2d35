//! Shared handler state: the database handle, the cache and the engine
//! tunables.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use taskflow_core::errors::{TfError, TfErrorKind};
use taskflow_engine::EngineSettings;
use taskflow_store::cache::{Cache, MemoryCache, RedisCache};

use crate::config::Settings;

/// Single SQLite connection shared by every request
///
/// Store calls are synchronous, so [`Db::call`] moves each one onto the
/// blocking pool and runs it inside the caller's tracing span.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// # Errors
    ///
    /// Whatever `f` returns, or `Internal` if the blocking task panicked
    /// or the connection lock is poisoned.
    pub async fn call<T, F>(&self, f: F) -> Result<T, TfError>
    where
        F: FnOnce(&mut Connection) -> taskflow_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let mut guard = conn.lock().map_err(|_| {
                TfError::new(TfErrorKind::Internal).with_message("database lock poisoned")
            })?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| {
            TfError::new(TfErrorKind::Internal).with_message(format!("store task failed: {e}"))
        })?
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub cache: Arc<dyn Cache>,
    pub settings: EngineSettings,
}

impl AppState {
    pub fn new(conn: Connection, cache: Arc<dyn Cache>, settings: EngineSettings) -> Self {
        Self {
            db: Db::new(conn),
            cache,
            settings,
        }
    }

    /// Open the database, bring its schema up to date and pick the cache
    /// backend named by `settings`.
    ///
    /// # Errors
    ///
    /// `Persistence` if the database cannot be opened or migrated, `Cache`
    /// for a malformed Redis URL.
    pub fn open(settings: &Settings) -> Result<Self, TfError> {
        let mut conn = taskflow_store::db::open(&settings.database_path)?;
        taskflow_store::db::configure(&conn)?;
        taskflow_store::migrations::apply_migrations(&mut conn)?;

        let cache: Arc<dyn Cache> = match settings.redis_url.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                tracing::info!("using redis cache");
                Arc::new(RedisCache::with_timeout(url, settings.redis_timeout())?)
            }
            _ => Arc::new(MemoryCache::new()),
        };
        Ok(Self::new(conn, cache, settings.engine_settings()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_for(db_path: &str) -> Settings {
        let vars: HashMap<String, String> =
            HashMap::from([("TASKFLOW_DATABASE_PATH".to_string(), db_path.to_string())]);
        Settings::from_sources(
            "does-not-exist",
            config::Environment::with_prefix("TASKFLOW").source(Some(vars)),
        )
        .unwrap()
    }

    #[test]
    fn test_open_puts_database_in_wal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskflow.db");
        let _state = AppState::open(&settings_for(path.to_str().unwrap())).unwrap();

        let conn = Connection::open(&path).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
        assert!(taskflow_store::migrations::current_version(&conn)
            .unwrap()
            .is_some());
    }
}
