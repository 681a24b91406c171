//! Version history handlers.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::Response;

use sehetak_core::types::DocumentId;
use sehetak_entity::VersionSummary;
use sehetak_service::NewVersion;

use crate::error::ApiError;
use crate::extractors::{ApiPath, Requester};
use crate::handlers::document::payload_response;
use crate::handlers::multipart::{multipart_error, non_blank, read_file, read_text};
use crate::state::AppState;

/// GET /api/documents/versions/{document_id}
pub async fn list_versions(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> Result<Json<Vec<VersionSummary>>, ApiError> {
    Ok(Json(state.document_service.list_versions(document_id).await?))
}

/// POST /api/documents/{document_id}/versions
///
/// Multipart fields: `file`, `changeDescription`.
pub async fn add_version(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(document_id): ApiPath<DocumentId>,
    mut multipart: Multipart,
) -> Result<Json<VersionSummary>, ApiError> {
    let mut new_version = NewVersion {
        file: None,
        change_description: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => new_version.file = read_file(field).await?,
            "changeDescription" => {
                new_version.change_description = non_blank(read_text(field).await?)
            }
            _ => {}
        }
    }

    let summary = state
        .document_service
        .add_version(&requester, document_id, new_version)
        .await?;
    Ok(Json(summary))
}

/// GET /api/documents/{document_id}/versions/{version_number}/download
pub async fn download_version(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath((document_id, version_number)): ApiPath<(DocumentId, i32)>,
) -> Result<Response, ApiError> {
    let payload = state
        .document_service
        .download_version(&requester, document_id, version_number)
        .await?;
    Ok(payload_response(payload)?)
}
