//! Typed path parameters with JSON error bodies.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use sehetak_core::error::AppError;

use crate::error::ApiError;

/// Like [`Path`], but a segment that fails to parse (`/download/abc`)
/// is rejected as a `VALIDATION` error instead of axum's plain-text body.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status().is_server_error() => Err(ApiError(
                AppError::internal(format!("Path extraction failed: {}", rejection.body_text())),
            )),
            Err(rejection) => Err(ApiError(AppError::validation(format!(
                "Invalid path parameter: {}",
                rejection.body_text()
            )))),
        }
    }
}
