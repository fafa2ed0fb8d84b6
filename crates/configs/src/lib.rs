use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

/// Upload cap applied to every multipart part (50 MB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Blob directory; also holds `metadata.json`.
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
    /// Holds `links.json`.
    #[serde(default = "default_links_dir")]
    pub links_dir: PathBuf,
    /// Fallback static asset root.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Cap on a whole request body; defaults to room for a handful of max-size files.
    #[serde(default)]
    pub max_request_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            links_dir: default_links_dir(),
            static_dir: default_static_dir(),
            max_file_bytes: default_max_file_bytes(),
            max_request_bytes: None,
        }
    }
}

fn default_documents_dir() -> PathBuf { PathBuf::from("public/documents") }
fn default_links_dir() -> PathBuf { PathBuf::from("public/links") }
fn default_static_dir() -> PathBuf { PathBuf::from("public") }
fn default_max_file_bytes() -> u64 { DEFAULT_MAX_FILE_BYTES }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults overridden by environment variables.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// Only a missing file falls back to the environment; unreadable or
    /// malformed files are errors.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("invalid config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(dir) = std::env::var("DOCUMENTS_DIR") {
            cfg.storage.documents_dir = dir.into();
        }
        if let Ok(dir) = std::env::var("LINKS_DIR") {
            cfg.storage.links_dir = dir.into();
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            cfg.storage.static_dir = dir.into();
        }
        if let Some(max) = std::env::var("MAX_UPLOAD_BYTES").ok().and_then(|v| v.parse::<u64>().ok()) {
            cfg.storage.max_file_bytes = max;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize()?;
        Ok(())
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.documents_dir.as_os_str().is_empty() {
            self.documents_dir = default_documents_dir();
        }
        if self.links_dir.as_os_str().is_empty() {
            self.links_dir = default_links_dir();
        }
        if self.static_dir.as_os_str().is_empty() {
            self.static_dir = default_static_dir();
        }
        if self.max_file_bytes == 0 {
            return Err(anyhow!("storage.max_file_bytes must be > 0"));
        }
        if let Some(max) = self.max_request_bytes {
            if max < self.max_file_bytes {
                return Err(anyhow!("storage.max_request_bytes must be >= max_file_bytes"));
            }
        }
        Ok(())
    }

    /// Body limit for the whole request: explicit value or ten max-size files plus multipart overhead.
    pub fn request_body_limit(&self) -> usize {
        let bytes = self
            .max_request_bytes
            .unwrap_or_else(|| self.max_file_bytes.saturating_mul(10).saturating_add(1024 * 1024));
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}
