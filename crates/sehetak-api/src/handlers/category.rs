//! Category handlers.

use axum::Json;
use axum::extract::State;

use sehetak_entity::Category;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/documents/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.category_service.list().await?))
}
