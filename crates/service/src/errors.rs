use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("upload error: {0}")]
    Upload(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}

/// Failure to read an index file. Never surfaced to callers: the index store
/// collapses it into an empty collection.
#[derive(Debug, Error)]
pub enum IndexReadError {
    #[error("index file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("index file is not a valid record array: {0}")]
    Parse(#[from] serde_json::Error),
}
