#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, StorageConfig};
use tower::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "----docs-manager-test-boundary";

/// Router over an isolated storage root, removed on drop.
pub struct TestApp {
    pub router: Router,
    pub cfg: AppConfig,
    root: PathBuf,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_max_file_bytes(configs::DEFAULT_MAX_FILE_BYTES).await
    }

    pub async fn with_max_file_bytes(max_file_bytes: u64) -> anyhow::Result<Self> {
        Self::with_limits(max_file_bytes, None).await
    }

    pub async fn with_limits(max_file_bytes: u64, max_request_bytes: Option<u64>) -> anyhow::Result<Self> {
        let root = std::env::temp_dir().join(format!("server_test_{}", Uuid::new_v4()));
        let public = root.join("public");
        let mut cfg = AppConfig::default();
        cfg.storage = StorageConfig {
            documents_dir: public.join("documents"),
            links_dir: public.join("links"),
            static_dir: public,
            max_file_bytes,
            max_request_bytes,
        };
        cfg.normalize_and_validate()?;
        let router = server::startup::build_app(&cfg).await?;
        Ok(Self { router, cfg, root })
    }

    pub fn documents_dir(&self) -> &Path {
        &self.cfg.storage.documents_dir
    }

    pub fn links_dir(&self) -> &Path {
        &self.cfg.storage.links_dir
    }

    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        Ok((status, headers, body))
    }

    pub async fn send_json(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let (status, _, body) = self.send(req).await?;
        let json = if body.is_empty() { serde_json::Value::Null } else { serde_json::from_slice(&body)? };
        Ok((status, json))
    }

    pub async fn get_json(&self, uri: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        self.send_json(Request::builder().uri(uri).body(Body::empty())?).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// `multipart/form-data` body with one `files` part per `(filename, content type, bytes)`.
pub fn multipart_body(files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(files: &[(&str, &str, &[u8])]) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/api/documents")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(files)))?)
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

pub fn empty_request(method: &str, uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method(method).uri(uri).body(Body::empty())?)
}

/// `^\d+[a-z0-9]+$`
pub fn looks_like_record_id(id: &str) -> bool {
    id.len() >= 2
        && id.starts_with(|c: char| c.is_ascii_digit())
        && id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}
