//! Database migration commands.

use clap::{Args, Subcommand};

use sehetak_core::config::DatabaseBackend;
use sehetak_core::error::AppError;
use sehetak_database::DatabasePool;
use sehetak_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("The in-memory backend has no schema to migrate.");
        return Ok(());
    }

    match &args.command {
        MigrateCommand::Run { yes } => {
            output::print_kv("Database", &config.database.masked_url());
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("Apply pending migrations to this database?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let db = DatabasePool::connect(&config.database).await?;
            println!("Running database migrations...");
            let outcome = run_migrations(db.pool()).await;
            db.close().await;
            outcome?;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
