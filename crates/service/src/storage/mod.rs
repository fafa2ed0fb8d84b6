//! Storage abstractions for service layer
//!
//! Contains the reusable file-backed record index shared by the document
//! and link stores.

pub mod json_index_store;
