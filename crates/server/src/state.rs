use std::sync::Arc;

use service::stores::{document_repository::DocumentRepository, link_repository::LinkRepository};

/// Shared handler state: the two stores behind their trait seams.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentRepository>,
    pub links: Arc<dyn LinkRepository>,
}
