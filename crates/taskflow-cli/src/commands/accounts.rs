//! Account administration
//!
//! Usage: taskflow accounts import --db <PATH> <FILE.json>
//!
//! The file holds a JSON array of account objects in the same shape the
//! create endpoint accepts. The import is all-or-nothing.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use taskflow_core::model::NewAccount;
use taskflow_engine::commands::accounts;
use taskflow_store::cache::MemoryCache;

use super::{open_db, CliResult};

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// Import accounts from a JSON array
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(long, default_value = "taskflow.db")]
    pub db: PathBuf,

    /// JSON file containing an array of accounts
    pub path: PathBuf,
}

pub fn execute(args: AccountsArgs) -> CliResult {
    match args.command {
        AccountsCommand::Import(import) => execute_import(import),
    }
}

fn execute_import(args: ImportArgs) -> CliResult {
    let raw = std::fs::read_to_string(&args.path)?;
    let rows: Vec<NewAccount> = serde_json::from_str(&raw)
        .map_err(|e| format!("{}: {}", args.path.display(), e))?;

    let mut conn = open_db(&args.db)?;
    // A running server holds its own cache; nothing here needs evicting
    let cache = MemoryCache::new();

    println!("Importing {} accounts from {}...", rows.len(), args.path.display());
    let tx = conn.transaction()?;
    for (index, row) in rows.into_iter().enumerate() {
        accounts::create_account(&tx, &cache, row)
            .map_err(|e| format!("row {}: {}", index + 1, e))?;
    }
    tx.commit()?;
    println!("✓ Imported");
    Ok(())
}
