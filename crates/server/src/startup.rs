use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, ServerConfig, StorageConfig};
use dotenvy::dotenv;
use service::{
    file::{document_store::DocumentStore, link_store::LinkStore},
    runtime,
    stores::{document_repository::DocumentRepository, link_repository::LinkRepository},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, state::AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Open both stores, creating their directories and index files if missing.
pub async fn build_state(storage: &StorageConfig) -> anyhow::Result<AppState> {
    let documents = DocumentStore::new(&storage.documents_dir, storage.max_file_bytes).await?;
    let links = LinkStore::new(&storage.links_dir).await?;

    let documents: Arc<dyn DocumentRepository> = documents;
    let links: Arc<dyn LinkRepository> = links;
    Ok(AppState { documents, links })
}

/// Build state and router for an already-validated configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(
        &cfg.storage.static_dir,
        &[cfg.storage.documents_dir.as_path(), cfg.storage.links_dir.as_path()],
    )
    .await?;
    let state = build_state(&cfg.storage).await?;
    Ok(routes::build_router(state, &cfg.storage, build_cors()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining in-flight requests");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_or_env()?;
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(
        %addr,
        documents_dir = %cfg.storage.documents_dir.display(),
        links_dir = %cfg.storage.links_dir.display(),
        max_file_bytes = cfg.storage.max_file_bytes,
        "starting documents server"
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
