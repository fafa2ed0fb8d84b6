//! Service layer for the documents manager.
//! - `storage`: the shared JSON index file helper.
//! - `file`: document (blob + metadata) and link stores built on it.
//! - `stores`: trait seams the HTTP layer depends on.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod file;
pub mod stores;
pub mod naming;
pub mod size_format;
