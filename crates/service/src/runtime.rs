//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure storage directories exist; warn on a missing static asset directory.
pub async fn ensure_env(static_dir: &Path, data_dirs: &[&Path]) -> anyhow::Result<()> {
    common::env::ensure_env(static_dir, data_dirs).await
}
