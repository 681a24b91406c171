//! # sehetak-api
//!
//! HTTP API layer for Sehetak built on Axum.
//!
//! Provides the document, version, sharing, category, and health
//! endpoints, the requester extractor, request logging and CORS
//! middleware, DTOs, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
