use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::file::link_store::{LinkInput, LinkRecord};

/// Trait abstraction for the bookmark registry.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn list(&self) -> Vec<LinkRecord>;
    async fn create(&self, input: LinkInput) -> Result<LinkRecord, ServiceError>;
    async fn update(&self, input: LinkInput) -> Result<LinkRecord, ServiceError>;
    async fn delete(&self, id: &str) -> Result<LinkRecord, ServiceError>;
}
