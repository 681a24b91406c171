//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use sehetak_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Underlying cause, only when the app is configured to expose it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server error body carrying its cause, attached to the response as an
/// extension. `middleware::error_details` decides whether it replaces the
/// generic body.
#[derive(Debug, Clone)]
pub struct DetailedErrorBody(pub ApiErrorResponse);

/// Handler error: an [`AppError`] on its way to becoming a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
        ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn body(&self) -> ApiErrorResponse {
        let err = &self.0;
        if err.kind.is_client_error() {
            return ApiErrorResponse {
                error: err.kind.as_str().to_string(),
                message: err.message.clone(),
                details: None,
            };
        }
        ApiErrorResponse {
            error: err.kind.as_str().to_string(),
            message: "Internal server error".to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind);
        let body = self.body();
        if !status.is_server_error() {
            return (status, Json(body)).into_response();
        }

        let detail = self.0.detail();
        tracing::error!(kind = %self.0.kind, error = %detail, "Request failed");
        let detailed = DetailedErrorBody(ApiErrorResponse {
            details: Some(detail),
            ..body.clone()
        });
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(detailed);
        response
    }
}
