pub mod accounts;
pub mod migrate;
pub mod user;

use std::path::Path;

use rusqlite::Connection;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the database at `path` with its schema up to date.
pub fn open_db(path: &Path) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut conn = taskflow_store::db::open(path)?;
    taskflow_store::db::configure(&conn)?;
    taskflow_store::migrations::apply_migrations(&mut conn)?;
    Ok(conn)
}
