//! Usage: taskflow migrate --db <PATH>

use clap::Args;
use std::path::PathBuf;

use super::{open_db, CliResult};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// SQLite database file (created if missing)
    #[arg(long, default_value = "taskflow.db")]
    pub db: PathBuf,
}

pub fn execute(args: MigrateArgs) -> CliResult {
    let conn = open_db(&args.db)?;
    match taskflow_store::migrations::current_version(&conn)? {
        Some(version) => println!("✓ Schema at {}", version),
        None => println!("✓ No migrations applied"),
    }
    Ok(())
}
