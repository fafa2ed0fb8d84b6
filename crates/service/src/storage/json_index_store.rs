use std::{
    marker::PhantomData,
    path::PathBuf,
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{IndexReadError, ServiceError};

/// Generic JSON file-backed record index.
///
/// Persists a `Vec<T>` as one pretty-printed JSON array. There is no in-memory
/// cache: reads parse the file fresh and writes read, mutate and rewrite it whole.
/// Writers of the same store are serialised by `write_lock`, and the file is
/// replaced through a sibling temp file plus rename so readers never observe a
/// half-written index.
pub struct JsonIndexStore<T> {
    file_path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonIndexStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Initialize the store from a path. Creates the parent directory and an empty array file if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = Self {
            file_path: path.into(),
            write_lock: Mutex::new(()),
            _records: PhantomData,
        };
        store.ensure_file().await?;
        Ok(Arc::new(store))
    }

    async fn ensure_file(&self) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::storage("create index directory", e))?;
        }
        if fs::try_exists(&self.file_path).await.unwrap_or(false) {
            return Ok(());
        }
        fs::write(&self.file_path, b"[]")
            .await
            .map_err(|e| ServiceError::storage("initialize index", e))?;
        debug!(path = %self.file_path.display(), "initialized empty index file");
        Ok(())
    }

    /// Read and parse the index without any fallback.
    pub async fn try_load(&self) -> Result<Vec<T>, IndexReadError> {
        let bytes = fs::read(&self.file_path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Read the index; an unreadable or corrupt file counts as an empty collection.
    pub async fn load(&self) -> Vec<T> {
        match self.try_load().await {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "index unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    async fn save(&self, records: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(records).map_err(|e| ServiceError::storage("encode index", e))?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::storage("write index", e))?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::storage("replace index", e));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string());
        self.file_path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
    }

    /// Read-modify-write under the store's write lock.
    ///
    /// When `f` fails nothing is written and its error is returned unchanged.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        self.ensure_file().await?;
        let mut records = self.load().await;
        let out = f(&mut records)?;
        self.save(&records).await?;
        debug!(path = %self.file_path.display(), count = records.len(), "index rewritten");
        Ok(out)
    }
}
