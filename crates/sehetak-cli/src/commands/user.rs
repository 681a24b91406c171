//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sehetak_core::error::AppError;
use sehetak_entity::{CreateUser, User, UserRole};
use sehetak_service::UserService;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Register a user
    Add {
        /// Unique user name
        username: String,
        /// `doctor` or `patient`
        #[arg(short, long, default_value = "patient")]
        role: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    username: String,
    role: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.get(),
            username: u.username.clone(),
            role: u.role.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = super::open_stores(&config).await?;
    if stores.backend_name() == "memory" {
        output::print_warning("Using the in-memory store; changes are discarded on exit.");
    }
    let users = UserService::new(stores.users.clone());

    let outcome = run(&args.command, &users, format).await;
    stores.close().await;
    outcome
}

async fn run(
    command: &UserCommand,
    users: &UserService,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        UserCommand::List => {
            let rows: Vec<UserRow> = users.list().await?.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Add { username, role } => {
            let role: UserRole = role.parse()?;
            let user = users
                .create(CreateUser {
                    username: username.clone(),
                    role,
                })
                .await?;
            output::print_success(&format!(
                "User '{}' created with ID {}",
                user.username, user.id
            ));
        }
    }
    Ok(())
}
