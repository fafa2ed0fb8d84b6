use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::file::document_store::{DocumentRecord, DocumentView, PendingUpload, StagedBlob};

/// Trait abstraction for document blob + metadata storage.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list(&self) -> Vec<DocumentView>;
    async fn stage(&self) -> Result<StagedBlob, ServiceError>;
    async fn commit(&self, uploads: Vec<PendingUpload>) -> Result<Vec<DocumentView>, ServiceError>;
    async fn discard(&self, uploads: Vec<PendingUpload>);
    async fn delete(&self, id: &str) -> Result<DocumentRecord, ServiceError>;
}
