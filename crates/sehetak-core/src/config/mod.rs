//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an optional environment overlay, and
//! `SEHETAK__SECTION__KEY` environment variables. Each sub-module
//! represents a logical configuration section.

pub mod app;
pub mod database;
pub mod documents;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::documents::DocumentsConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Environment variable selecting the configuration overlay.
pub const ENV_SELECTOR: &str = "SEHETAK_ENV";

/// Prefix of environment variables overriding individual keys.
pub const ENV_PREFIX: &str = "SEHETAK";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistent store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload limits and the MIME allow-list.
    #[serde(default)]
    pub documents: DocumentsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `SEHETAK__`, then validates the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        Self::finish(builder)
    }

    /// Load configuration from an explicit file path plus environment
    /// variable overrides. The file must exist.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let builder =
            config::Config::builder().add_source(config::File::with_name(path).required(true));
        Self::finish(builder)
    }

    /// Resolve the active environment name from `SEHETAK_ENV`.
    pub fn active_env() -> String {
        std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string())
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("documents.allowed_mime_types")
                    .with_list_parse_key("server.cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.documents.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "documents.max_upload_size_bytes must be greater than zero",
            ));
        }
        if self.documents.allowed_mime_types.is_empty() {
            return Err(AppError::configuration(
                "documents.allowed_mime_types must list at least one type",
            ));
        }
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.trim().is_empty()
        {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::configuration(
                "database.min_connections cannot exceed database.max_connections",
            ));
        }
        Ok(())
    }
}
