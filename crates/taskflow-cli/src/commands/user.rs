//! User administration
//!
//! Usage: taskflow user create --db <PATH> --referenceid <ID> --email <EMAIL>
//!        --password <PASSWORD> --role <ROLE> [--tsm <ID>] [--manager <ID>]

use clap::{Args, Subcommand};
use std::path::PathBuf;
use taskflow_core::model::{NewUser, Role};
use taskflow_core_types::Sensitive;
use taskflow_engine::commands::users;

use super::{open_db, CliResult};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user with a hashed password
    Create(CreateArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long, default_value = "taskflow.db")]
    pub db: PathBuf,

    #[arg(long)]
    pub referenceid: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Territory Sales Associate | Territory Sales Manager | Manager | Admin
    /// (tsa and tsm also accepted)
    #[arg(long)]
    pub role: String,

    #[arg(long, default_value = "")]
    pub firstname: String,

    #[arg(long, default_value = "")]
    pub lastname: String,

    #[arg(long)]
    pub tsm: Option<String>,

    #[arg(long)]
    pub manager: Option<String>,

    #[arg(long)]
    pub department: Option<String>,
}

pub fn execute(args: UserArgs) -> CliResult {
    match args.command {
        UserCommand::Create(create) => execute_create(create),
    }
}

fn execute_create(args: CreateArgs) -> CliResult {
    let role: Role = args.role.parse()?;
    let conn = open_db(&args.db)?;

    // Names default to the reference id so bootstrap admins need no extra flags
    let or_reference = |name: String| {
        if name.trim().is_empty() {
            args.referenceid.clone()
        } else {
            name
        }
    };
    let profile = users::create_user(
        &conn,
        NewUser {
            referenceid: Some(args.referenceid.clone()),
            email: Some(args.email),
            firstname: Some(or_reference(args.firstname)),
            lastname: Some(or_reference(args.lastname)),
            password: Some(Sensitive::new(args.password)),
            role: Some(role),
            tsm: args.tsm,
            manager: args.manager,
            department: args.department,
            extra: None,
        },
    )?;

    println!(
        "✓ Created {} ({}, {})",
        profile.referenceid, profile.email, profile.role
    );
    Ok(())
}
