use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::naming::{generate_id, sanitize_file_name, stored_file_name, today};
use crate::size_format::format_file_size;
use crate::storage::json_index_store::JsonIndexStore;
use crate::stores::document_repository::DocumentRepository;

pub const METADATA_FILE: &str = "metadata.json";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata entry for one uploaded blob, as persisted in `metadata.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    /// Stored filename, `{id}_{originalName}`.
    pub name: String,
    pub original_name: String,
    pub upload_date: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    /// Location of the blob relative to the blob directory; equal to `name`.
    pub path: String,
}

/// A record plus its computed `sizeFormatted`, as returned to clients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    #[serde(flatten)]
    pub record: DocumentRecord,
    pub size_formatted: String,
}

impl From<DocumentRecord> for DocumentView {
    fn from(record: DocumentRecord) -> Self {
        let size_formatted = format_file_size(record.size);
        Self { record, size_formatted }
    }
}

/// Upload bytes streamed into a staging file inside the blob directory.
/// The configured per-file cap is enforced chunk by chunk.
#[derive(Debug)]
pub struct StagedBlob {
    path: PathBuf,
    file: fs::File,
    written: u64,
    limit: u64,
}

impl StagedBlob {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ServiceError> {
        let next = self.written + chunk.len() as u64;
        if next > self.limit {
            return Err(ServiceError::Upload(format!(
                "file exceeds maximum size of {} bytes",
                self.limit
            )));
        }
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| ServiceError::Upload(format!("write staging file: {e}")))?;
        self.written = next;
        Ok(())
    }

    async fn finish(mut self) -> Result<(PathBuf, u64), ServiceError> {
        self.file
            .flush()
            .await
            .map_err(|e| ServiceError::Upload(format!("flush staging file: {e}")))?;
        Ok((self.path, self.written))
    }

    async fn discard(self) {
        let StagedBlob { path, file, .. } = self;
        drop(file);
        if let Err(e) = fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "could not remove staging file");
        }
    }
}

/// One multipart file part, staged and waiting to be committed.
#[derive(Debug)]
pub struct PendingUpload {
    pub blob: StagedBlob,
    pub original_name: Option<String>,
    pub content_type: Option<String>,
}

/// Blob directory plus its `metadata.json` index.
pub struct DocumentStore {
    dir: PathBuf,
    index: Arc<JsonIndexStore<DocumentRecord>>,
    max_file_bytes: u64,
}

impl DocumentStore {
    /// Initialize the blob directory and its index. Creates both if missing.
    pub async fn new<P: Into<PathBuf>>(dir: P, max_file_bytes: u64) -> Result<Arc<Self>, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::storage("create documents directory", e))?;
        let index = JsonIndexStore::new(dir.join(METADATA_FILE)).await?;
        Ok(Arc::new(Self { dir, index, max_file_bytes }))
    }

    pub fn blob_dir(&self) -> &Path {
        &self.dir
    }

    /// All records in upload order, each with its formatted size.
    pub async fn list(&self) -> Vec<DocumentView> {
        self.index.load().await.into_iter().map(DocumentView::from).collect()
    }

    pub async fn get(&self, id: &str) -> Option<DocumentRecord> {
        self.index.load().await.into_iter().find(|d| d.id == id)
    }

    /// Open a fresh staging file for one incoming part.
    pub async fn stage(&self) -> Result<StagedBlob, ServiceError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ServiceError::Upload(format!("create documents directory: {e}")))?;
        let path = self.dir.join(format!(".upload-{}.part", Uuid::new_v4()));
        let file = fs::File::create(&path)
            .await
            .map_err(|e| ServiceError::Upload(format!("create staging file: {e}")))?;
        Ok(StagedBlob { path, file, written: 0, limit: self.max_file_bytes })
    }

    /// Move every staged blob to its final name, then append all records and
    /// persist the index once.
    ///
    /// Blobs renamed before a failure are left on disk without index entries.
    pub async fn commit(&self, uploads: Vec<PendingUpload>) -> Result<Vec<DocumentView>, ServiceError> {
        let mut created = Vec::with_capacity(uploads.len());
        let mut remaining = uploads.into_iter();

        while let Some(upload) = remaining.next() {
            match self.commit_one(upload).await {
                Ok(record) => created.push(record),
                Err(e) => {
                    self.discard(remaining.collect()).await;
                    return Err(e);
                }
            }
        }

        let appended = created.clone();
        self.index
            .update(move |records| {
                records.extend(appended);
                Ok(())
            })
            .await?;

        info!(count = created.len(), "documents uploaded");
        Ok(created.into_iter().map(DocumentView::from).collect())
    }

    async fn commit_one(&self, upload: PendingUpload) -> Result<DocumentRecord, ServiceError> {
        let PendingUpload { blob, original_name, content_type } = upload;
        let (staging_path, size) = blob.finish().await?;

        let id = generate_id();
        let original_name = original_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let name = stored_file_name(&id, &original_name);
        let target = self.dir.join(&name);

        if let Err(e) = fs::rename(&staging_path, &target).await {
            let _ = fs::remove_file(&staging_path).await;
            return Err(ServiceError::storage("move upload into place", e));
        }
        debug!(%id, stored = %name, size, "blob stored");

        Ok(DocumentRecord {
            id,
            path: name.clone(),
            name,
            original_name,
            upload_date: today(),
            size,
            content_type: content_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        })
    }

    /// Remove staging files of an aborted request.
    pub async fn discard(&self, uploads: Vec<PendingUpload>) {
        for upload in uploads {
            upload.blob.discard().await;
        }
    }

    /// Stage, write and commit a single in-memory file.
    pub async fn upload_bytes(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<DocumentView, ServiceError> {
        let mut blob = self.stage().await?;
        if let Err(e) = blob.write_chunk(bytes).await {
            blob.discard().await;
            return Err(e);
        }
        let pending = PendingUpload {
            blob,
            original_name: Some(original_name.to_string()),
            content_type: content_type.map(str::to_string),
        };
        let mut views = self.commit(vec![pending]).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::Storage("upload produced no record".into()))
    }

    /// Remove the blob, then its index entry. A blob already missing from disk
    /// is tolerated; any other removal failure leaves the record in place.
    pub async fn delete(&self, id: &str) -> Result<DocumentRecord, ServiceError> {
        let record = match self.get(id).await {
            Some(record) if !id.is_empty() => record,
            _ => return Err(ServiceError::not_found("Document")),
        };
        self.remove_blob(&record).await?;

        let removed = self
            .index
            .update(|records| {
                let pos = records
                    .iter()
                    .position(|d| d.id == record.id)
                    .ok_or_else(|| ServiceError::not_found("Document"))?;
                Ok(records.remove(pos))
            })
            .await?;

        info!(id = %removed.id, "document deleted");
        Ok(removed)
    }

    async fn remove_blob(&self, record: &DocumentRecord) -> Result<(), ServiceError> {
        let Some(file_name) = sanitize_file_name(&record.path) else {
            warn!(id = %record.id, path = %record.path, "record has no usable blob path");
            return Ok(());
        };
        let blob = self.dir.join(file_name);
        match fs::remove_file(&blob).await {
            Ok(()) => debug!(path = %blob.display(), "blob removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %blob.display(), "blob already missing")
            }
            Err(e) => return Err(ServiceError::storage("remove blob", e)),
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentRepository for DocumentStore {
    async fn list(&self) -> Vec<DocumentView> { self.list().await }
    async fn stage(&self) -> Result<StagedBlob, ServiceError> { self.stage().await }
    async fn commit(&self, uploads: Vec<PendingUpload>) -> Result<Vec<DocumentView>, ServiceError> { self.commit(uploads).await }
    async fn discard(&self, uploads: Vec<PendingUpload>) { self.discard(uploads).await }
    async fn delete(&self, id: &str) -> Result<DocumentRecord, ServiceError> { self.delete(id).await }
}
