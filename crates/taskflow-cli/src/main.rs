//! Taskflow admin CLI
//!
//! Database maintenance that has no HTTP endpoint: schema migration,
//! bootstrapping users and bulk account import.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "taskflow")]
#[command(about = "Taskflow - sales activity tracking administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate(commands::migrate::MigrateArgs),
    /// User administration
    User(commands::user::UserArgs),
    /// Account administration
    Accounts(commands::accounts::AccountsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args),
        Commands::User(args) => commands::user::execute(args),
        Commands::Accounts(args) => commands::accounts::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
