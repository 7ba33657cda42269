use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use chrono::Utc;
use judging_common::documents::ContentHash;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tokio_util::io::ReaderStream;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::document;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::document::*;
use crate::state::AppState;
use crate::utils::filename::{content_disposition, validate_upload_filename};

/// Request body limit for uploads: base64 inflates by 4/3, plus room for the JSON envelope.
pub fn upload_body_limit(max_document_size: u64) -> DefaultBodyLimit {
    let limit = max_document_size.saturating_mul(4) / 3 + 64 * 1024;
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "Documents",
    operation_id = "uploadDocument",
    summary = "Upload a document",
    description = "Stores a base64-encoded file and returns a shareable link. Anyone holding the link can view the file.",
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document stored", body = UploadDocumentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 413, description = "Document too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(filename = %payload.filename))]
pub async fn upload_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let filename = validate_upload_filename(&payload.filename)?.to_string();
    let bytes = decode_payload(&payload.base64)?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Document is empty".into()));
    }

    let hash = state.documents.put(&bytes).await?;
    let content_type = resolve_content_type(&payload.mime_type, &filename);

    let model = document::ActiveModel {
        id: Set(Uuid::new_v4()),
        filename: Set(filename.clone()),
        content_type: Set(content_type),
        content_hash: Set(hash.to_hex()),
        size: Set(bytes.len() as i64),
        uploaded_by: Set(auth_user.user_id),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(document_id = %model.id, size = model.size, "document uploaded");

    let file_url = format!(
        "{}/api/v1/documents/{}",
        state.config.storage.public_base_url.trim_end_matches('/'),
        model.id
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponse {
            status: "success",
            file_url,
            filename,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    operation_id = "downloadDocument",
    summary = "View an uploaded document",
    description = "Streams the stored bytes with their recorded content type. No authentication: the id is the share link.",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document content"),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(%id))]
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("Document not found".into());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    let doc = document::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)?;

    let hash = ContentHash::parse(&doc.content_hash)?;
    let reader = state.documents.open(&hash).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &doc.content_type)
        .header(header::CONTENT_LENGTH, doc.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition("inline", &doc.filename),
        )
        .header(header::ETAG, format!("\"{}\"", doc.content_hash))
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
