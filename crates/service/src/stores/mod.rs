//! Trait seams over the file-backed stores, so handlers depend on behaviour
//! rather than on the JSON-file implementations.

pub mod document_repository;
pub mod link_repository;
