//! Swaps in the detailed server error body when the app exposes causes.

use axum::Json;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::DetailedErrorBody;
use crate::state::AppState;

/// Replaces a generic 5xx body with its detailed form when
/// `server.expose_error_details` is set for this app.
pub async fn expose_error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(DetailedErrorBody(body)) = response.extensions_mut().remove::<DetailedErrorBody>()
    else {
        return response;
    };
    if !state.config.server.expose_error_details {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let rebuilt = (parts.status, Json(body)).into_response();
    let (rebuilt_parts, rebuilt_body) = rebuilt.into_parts();
    parts.headers.extend(rebuilt_parts.headers);
    Response::from_parts(parts, rebuilt_body)
}
