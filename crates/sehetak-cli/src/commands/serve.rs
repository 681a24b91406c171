//! Start the Sehetak server.

use clap::Args;

use sehetak_core::config::DatabaseBackend;
use sehetak_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Use the in-memory store regardless of configuration
    #[arg(long)]
    pub memory: bool,

    /// Skip database migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.memory {
        config.database.backend = DatabaseBackend::Memory;
    }
    if args.skip_migrations {
        config.database.run_migrations = false;
    }

    println!("Starting Sehetak server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    let stores = super::open_stores(&config).await?;
    println!("  Store: {}", stores.backend_name());

    sehetak_api::run_server(config, stores).await
}
