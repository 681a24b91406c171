//! Route definitions for the Sehetak HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Slack above the upload limit for multipart framing and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.documents.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(document_routes())
        .merge(version_routes())
        .merge(sharing_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::error_details::expose_error_details,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Upload, listing, download, delete, categories
fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/categories",
            get(handlers::category::list_categories),
        )
        .route("/documents/upload", post(handlers::document::upload))
        .route(
            "/documents/user/{user_id}",
            get(handlers::document::list_for_user),
        )
        .route(
            "/documents/download/{document_id}",
            get(handlers::document::download),
        )
        .route("/documents/{document_id}", delete(handlers::document::delete))
}

/// Version history and per-version download
fn version_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/versions/{document_id}",
            get(handlers::version::list_versions),
        )
        .route(
            "/documents/{document_id}/versions",
            post(handlers::version::add_version),
        )
        .route(
            "/documents/{document_id}/versions/{version_number}/download",
            get(handlers::version::download_version),
        )
}

/// Owner-managed grants
fn sharing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/{document_id}/shares",
            get(handlers::sharing::list_grants).post(handlers::sharing::share),
        )
        .route(
            "/documents/{document_id}/shares/{user_id}",
            delete(handlers::sharing::revoke),
        )
}

/// Health check endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}
