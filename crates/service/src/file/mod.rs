pub mod document_store;
pub mod link_store;
