//! Document handlers: upload, listing, download, delete.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use sehetak_core::error::AppError;
use sehetak_core::types::{CategoryId, DocumentId, UserId};
use sehetak_entity::{DocumentPayload, DocumentSummary};
use sehetak_service::UploadRequest;

use crate::dto::response::{MessageResponse, UploadResponse};
use crate::error::ApiError;
use crate::extractors::{ApiPath, Requester};
use crate::extractors::requester::parse_user_id;
use crate::handlers::multipart::{multipart_error, non_blank, read_file, read_text};
use crate::state::AppState;

/// POST /api/documents/upload
///
/// Multipart fields: `userId`, `type`, `description`, `categoryId`, `file`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut owner_id: Option<UserId> = None;
    let mut doc_type = String::new();
    let mut description: Option<String> = None;
    let mut category_id: Option<CategoryId> = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "userId" => {
                let raw = read_text(field).await?;
                if let Some(raw) = non_blank(raw) {
                    owner_id = Some(parse_user_id(&raw)?);
                }
            }
            "type" => doc_type = read_text(field).await?,
            "description" => description = non_blank(read_text(field).await?),
            "categoryId" => {
                let raw = read_text(field).await?;
                category_id = non_blank(raw)
                    .map(|raw| {
                        raw.parse::<CategoryId>()
                            .map_err(|_| AppError::validation(format!("Invalid category ID '{raw}'")))
                    })
                    .transpose()?;
            }
            "file" => file = read_file(field).await?,
            _ => {}
        }
    }

    let owner_id = owner_id.ok_or_else(|| AppError::validation("User ID is required"))?;

    let document_id = state
        .upload_service
        .upload(UploadRequest {
            owner_id,
            doc_type,
            description,
            category_id,
            file,
        })
        .await?;

    Ok(Json(UploadResponse {
        message: "Document uploaded successfully".to_string(),
        document_id,
    }))
}

/// GET /api/documents/user/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<DocumentSummary>>, ApiError> {
    Ok(Json(state.document_service.list_for_user(user_id).await?))
}

/// GET /api/documents/download/{document_id}
pub async fn download(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> Result<Response, ApiError> {
    let payload = state
        .document_service
        .download(&requester, document_id)
        .await?;
    Ok(payload_response(payload)?)
}

/// DELETE /api/documents/{document_id}
pub async fn delete(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .document_service
        .delete(&requester, document_id)
        .await?;
    Ok(Json(MessageResponse::new("Document deleted successfully")))
}

/// Raw bytes with the stored MIME type, displayed inline.
pub(crate) fn payload_response(payload: DocumentPayload) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, payload.mime_type.as_str())
        .header(header::CONTENT_LENGTH, payload.data.len())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&payload.file_name),
        )
        .body(Body::from(payload.data))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}

/// `inline` disposition with an ASCII fallback name and the exact UTF-8
/// name in `filename*`.
pub(crate) fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(file_name, NON_ALPHANUMERIC);
    format!("inline; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
