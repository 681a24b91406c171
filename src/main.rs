//! Sehetak Server: medical document storage with versioning and sharing.
//!
//! Main entry point that loads configuration, opens the stores, and
//! starts the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use sehetak_core::config::AppConfig;
use sehetak_core::error::AppError;
use sehetak_database::Stores;

/// Explicit configuration file, bypassing the environment overlays.
const CONFIG_PATH_VAR: &str = "SEHETAK_CONFIG";

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e.detail());
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => AppConfig::from_file(&path),
        Err(_) => AppConfig::load(&AppConfig::active_env()),
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        env = %AppConfig::active_env(),
        "Starting Sehetak v{}",
        env!("CARGO_PKG_VERSION")
    );

    let stores = Stores::open(&config.database).await?;
    sehetak_api::run_server(config, stores).await
}
