pub mod documents;
pub mod links;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use configs::StorageConfig;
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc, state::AppState};

/// `?id=` selector shared by the delete endpoints.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_handler() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: resource APIs, blob downloads,
/// operational endpoints and the static fallback.
pub fn build_router(state: AppState, storage: &StorageConfig, cors: CorsLayer) -> Router {
    metrics::init();

    // Resource APIs. The whole-request cap is enforced by the body extractors, so
    // an oversized body surfaces as a multipart or JSON error rather than a bare 413.
    // Per-file caps are enforced while staging.
    let api = Router::new()
        .route(
            "/api/documents",
            get(documents::list)
                .post(documents::upload)
                .delete(documents::delete)
                .fallback(documents::method_not_allowed),
        )
        .route(
            "/api/links",
            get(links::list)
                .post(links::create)
                .put(links::update)
                .delete(links::delete)
                .fallback(links::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(storage.request_body_limit()));

    // Operational routes
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json));

    ops.merge(api)
        .nest_service("/documents", ServeDir::new(&storage.documents_dir))
        .fallback_service(ServeDir::new(&storage.static_dir))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
