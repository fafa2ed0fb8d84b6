use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use common::types::MessageBody;
use serde::Serialize;
use service::{
    file::link_store::{LinkInput, LinkRecord},
    stores::link_repository::LinkRepository,
};

use super::IdQuery;
use crate::{errors::JsonApiError, metrics, state::AppState};

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub message: &'static str,
    pub link: LinkRecord,
}

fn json_body(payload: Result<Json<LinkInput>, JsonRejection>) -> Result<LinkInput, JsonApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid JSON body", Some(e.body_text())))
}

#[utoipa::path(get, path = "/api/links", tag = "links", responses((status = 200, description = "All links")))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<LinkRecord>> {
    Json(state.links.list().await)
}

#[utoipa::path(
    post, path = "/api/links", tag = "links",
    request_body = crate::openapi::LinkInputDoc,
    responses(
        (status = 201, description = "Link added"),
        (status = 400, description = "Name and URL are required"),
        (status = 500, description = "Failed to add link")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<LinkInput>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), JsonApiError> {
    let input = json_body(payload)?;
    let link = state
        .links
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "links", "Failed to add link"))?;
    metrics::LINK_MUTATIONS_TOTAL.with_label_values(&["create"]).inc();
    Ok((StatusCode::CREATED, Json(LinkResponse { message: "Link added successfully", link })))
}

#[utoipa::path(
    put, path = "/api/links", tag = "links",
    request_body = crate::openapi::LinkInputDoc,
    responses(
        (status = 200, description = "Link updated"),
        (status = 400, description = "ID, name, and URL are required"),
        (status = 404, description = "Link not found"),
        (status = 500, description = "Failed to update link")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<LinkInput>, JsonRejection>,
) -> Result<Json<LinkResponse>, JsonApiError> {
    let input = json_body(payload)?;
    let link = state
        .links
        .update(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "links", "Failed to update link"))?;
    metrics::LINK_MUTATIONS_TOTAL.with_label_values(&["update"]).inc();
    Ok(Json(LinkResponse { message: "Link updated successfully", link }))
}

#[utoipa::path(
    delete, path = "/api/links", tag = "links",
    params(IdQuery),
    responses(
        (status = 200, description = "Link deleted"),
        (status = 400, description = "ID is required"),
        (status = 404, description = "Link not found")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<MessageBody>, JsonApiError> {
    let id = q.id.unwrap_or_default();
    state
        .links
        .delete(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "links", "Failed to delete link"))?;
    metrics::LINK_MUTATIONS_TOTAL.with_label_values(&["delete"]).inc();
    Ok(Json(MessageBody::new("Link deleted successfully")))
}

pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        format!("Method {method} Not Allowed"),
    )
}
