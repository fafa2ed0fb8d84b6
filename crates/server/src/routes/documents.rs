use axum::{
    extract::{multipart::{Field, MultipartRejection}, Multipart, Query, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use common::types::MessageBody;
use serde::Serialize;
use service::{
    errors::ServiceError,
    file::document_store::{DocumentView, PendingUpload, StagedBlob},
    stores::document_repository::DocumentRepository,
};
use tracing::{info, warn};

use super::IdQuery;
use crate::{errors::JsonApiError, metrics, state::AppState};

/// Multipart field carrying the uploaded files.
pub const FILES_FIELD: &str = "files";
pub const ALLOWED_METHODS: &str = "GET, POST, DELETE";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub files: Vec<DocumentView>,
}

#[utoipa::path(get, path = "/api/documents", tag = "documents", responses((status = 200, description = "All documents with formatted sizes")))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<DocumentView>> {
    Json(state.documents.list().await)
}

#[utoipa::path(
    post, path = "/api/documents", tag = "documents",
    request_body(content = crate::openapi::UploadFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files uploaded"),
        (status = 500, description = "Upload failed")
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, JsonApiError> {
    let mut multipart = multipart.map_err(|e| upload_failed(ServiceError::Upload(e.body_text())))?;
    let docs = state.documents.as_ref();

    let mut pending = Vec::new();
    if let Err(e) = read_parts(docs, &mut multipart, &mut pending).await {
        warn!(staged = pending.len(), error = %e, "upload aborted, discarding staged files");
        docs.discard(pending).await;
        return Err(upload_failed(e));
    }

    let files = docs.commit(pending).await.map_err(upload_failed)?;
    let bytes: u64 = files.iter().map(|d| d.record.size).sum();
    metrics::DOCUMENTS_UPLOADED_TOTAL.inc_by(files.len() as u64);
    metrics::UPLOAD_BYTES_TOTAL.inc_by(bytes);
    info!(count = files.len(), bytes, "upload request stored");

    Ok(Json(UploadResponse { message: "Files uploaded successfully", files }))
}

/// Stage every `files` part. Parts without a filename are plain form fields and are skipped.
/// Staged blobs are pushed to `pending` even when their copy fails so the caller can discard them.
async fn read_parts(
    docs: &dyn DocumentRepository,
    multipart: &mut Multipart,
    pending: &mut Vec<PendingUpload>,
) -> Result<(), ServiceError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Upload(e.body_text()))?
    {
        if field.name() != Some(FILES_FIELD) || field.file_name().is_none() {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut blob = docs.stage().await?;
        let copied = copy_field(&mut field, &mut blob).await;
        pending.push(PendingUpload { blob, original_name, content_type });
        copied?;
    }
    Ok(())
}

async fn copy_field(field: &mut Field<'_>, blob: &mut StagedBlob) -> Result<(), ServiceError> {
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ServiceError::Upload(e.body_text()))?
    {
        blob.write_chunk(&chunk).await?;
    }
    Ok(())
}

fn upload_failed(err: ServiceError) -> JsonApiError {
    metrics::STORE_ERRORS_TOTAL.with_label_values(&["documents"]).inc();
    JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed", Some(err.to_string()))
}

#[utoipa::path(
    delete, path = "/api/documents", tag = "documents",
    params(IdQuery),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Failed to delete document")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<MessageBody>, JsonApiError> {
    let id = q.id.unwrap_or_default();
    state
        .documents
        .delete(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "documents", "Failed to delete document"))?;
    metrics::DOCUMENTS_DELETED_TOTAL.inc();
    Ok(Json(MessageBody::new("Document deleted successfully")))
}

pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        format!("Method {method} Not Allowed"),
    )
}
