//! Application builder and server runner.

use std::time::Duration;

use axum::Router;

use sehetak_core::config::AppConfig;
use sehetak_core::error::AppError;
use sehetak_database::Stores;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application over the given stores.
pub fn build_app(config: AppConfig, stores: Stores) -> Router {
    build_router(AppState::new(config, stores))
}

/// Serve the API until a shutdown signal arrives, then release the stores.
pub async fn run_server(config: AppConfig, stores: Stores) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    tracing::info!(
        backend = stores.backend_name(),
        max_upload_bytes = config.documents.max_upload_size_bytes,
        "Starting Sehetak server..."
    );

    let app = build_app(config, stores.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Sehetak server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if tokio::time::timeout(grace, stores.close()).await.is_err() {
        tracing::warn!(
            grace_seconds = grace.as_secs(),
            "Store shutdown exceeded grace period"
        );
    }
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
