use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::errors::ServiceError;
use crate::naming::{generate_id, today};
use crate::storage::json_index_store::JsonIndexStore;
use crate::stores::link_repository::LinkRepository;

pub const LINKS_FILE: &str = "links.json";
pub const DEFAULT_CATEGORY: &str = "Other";

/// Bookmark entry persisted in `links.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub added_date: String,
    pub category: String,
}

/// Create/update payload. Every field is optional on the wire so that a
/// missing field is reported as a validation error rather than a decode error.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LinkInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Trimmed and defaulted editable fields.
struct LinkFields {
    name: String,
    url: String,
    description: String,
    category: String,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

impl LinkInput {
    fn fields(&self, required_message: &str) -> Result<LinkFields, ServiceError> {
        let name = trimmed(&self.name);
        let url = trimmed(&self.url);
        if name.is_empty() || url.is_empty() {
            return Err(ServiceError::Validation(required_message.into()));
        }
        let category = match trimmed(&self.category) {
            c if c.is_empty() => DEFAULT_CATEGORY.to_string(),
            c => c,
        };
        Ok(LinkFields { name, url, description: trimmed(&self.description), category })
    }
}

/// File-backed bookmark registry.
pub struct LinkStore {
    index: Arc<JsonIndexStore<LinkRecord>>,
}

impl LinkStore {
    /// Initialize the registry under `dir`, creating `links.json` if missing.
    pub async fn new<P: Into<PathBuf>>(dir: P) -> Result<Arc<Self>, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::storage("create links directory", e))?;
        let index = JsonIndexStore::new(dir.join(LINKS_FILE)).await?;
        Ok(Arc::new(Self { index }))
    }

    pub async fn list(&self) -> Vec<LinkRecord> {
        self.index.load().await
    }

    pub async fn get(&self, id: &str) -> Option<LinkRecord> {
        self.index.load().await.into_iter().find(|l| l.id == id)
    }

    pub async fn create(&self, input: LinkInput) -> Result<LinkRecord, ServiceError> {
        let fields = input.fields("Name and URL are required")?;
        let link = LinkRecord {
            id: generate_id(),
            name: fields.name,
            url: fields.url,
            description: fields.description,
            added_date: today(),
            category: fields.category,
        };
        let appended = link.clone();
        self.index
            .update(move |links| {
                links.push(appended);
                Ok(())
            })
            .await?;
        info!(id = %link.id, category = %link.category, "link added");
        Ok(link)
    }

    /// Replace the editable fields of an existing link; `id` and `addedDate` are kept.
    pub async fn update(&self, input: LinkInput) -> Result<LinkRecord, ServiceError> {
        const REQUIRED: &str = "ID, name, and URL are required";
        let id = trimmed(&input.id);
        if id.is_empty() {
            return Err(ServiceError::Validation(REQUIRED.into()));
        }
        let fields = input.fields(REQUIRED)?;

        let updated = self
            .index
            .update(|links| {
                let link = links
                    .iter_mut()
                    .find(|l| l.id == id)
                    .ok_or_else(|| ServiceError::not_found("Link"))?;
                link.name = fields.name;
                link.url = fields.url;
                link.description = fields.description;
                link.category = fields.category;
                Ok(link.clone())
            })
            .await?;
        info!(id = %updated.id, "link updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<LinkRecord, ServiceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::Validation("ID is required".into()));
        }
        let removed = self
            .index
            .update(|links| {
                let pos = links
                    .iter()
                    .position(|l| l.id == id)
                    .ok_or_else(|| ServiceError::not_found("Link"))?;
                Ok(links.remove(pos))
            })
            .await?;
        info!(id = %removed.id, "link deleted");
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl LinkRepository for LinkStore {
    async fn list(&self) -> Vec<LinkRecord> { self.list().await }
    async fn create(&self, input: LinkInput) -> Result<LinkRecord, ServiceError> { self.create(input).await }
    async fn update(&self, input: LinkInput) -> Result<LinkRecord, ServiceError> { self.update(input).await }
    async fn delete(&self, id: &str) -> Result<LinkRecord, ServiceError> { self.delete(id).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempDir;

    async fn setup_store() -> (TempDir, Arc<LinkStore>) {
        let tmp = TempDir::new("links");
        let store = LinkStore::new(tmp.path().join("links")).await.expect("store init");
        (tmp, store)
    }

    fn input(name: &str, url: &str) -> LinkInput {
        LinkInput { name: Some(name.into()), url: Some(url.into()), ..LinkInput::default() }
    }

    #[tokio::test]
    async fn create_trims_and_defaults_category() -> Result<(), anyhow::Error> {
        let (_tmp, store) = setup_store().await;
        let created = store
            .create(LinkInput {
                category: Some(String::new()),
                description: Some("  design files ".into()),
                ..input(" Figma ", " figma.com ")
            })
            .await?;

        assert_eq!(created.name, "Figma");
        assert_eq!(created.url, "figma.com");
        assert_eq!(created.description, "design files");
        assert_eq!(created.category, "Other");
        assert_eq!(created.added_date, today());
        assert!(created.id.chars().next().unwrap().is_ascii_digit());

        assert_eq!(store.list().await, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_name_and_url() -> Result<(), anyhow::Error> {
        let (_tmp, store) = setup_store().await;
        for bad in [input("", "x.com"), input("x", "   "), LinkInput::default()] {
            match store.create(bad).await {
                Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Name and URL are required"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert!(store.list().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() -> Result<(), anyhow::Error> {
        let (_tmp, store) = setup_store().await;
        let original = store
            .create(LinkInput { category: Some("Design".into()), ..input("Figma", "figma.com") })
            .await?;
        let other = store.create(input("Docs", "docs.rs")).await?;

        let updated = store
            .update(LinkInput {
                id: Some(original.id.clone()),
                description: None,
                category: Some("Architecture".into()),
                ..input("Miro", "miro.com")
            })
            .await?;
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.added_date, original.added_date);
        assert_eq!(updated.name, "Miro");
        assert_eq!(updated.url, "miro.com");
        assert_eq!(updated.description, "");
        assert_eq!(updated.category, "Architecture");

        assert_eq!(store.list().await, vec![updated, other]);
        Ok(())
    }

    #[tokio::test]
    async fn update_validation_and_not_found() -> Result<(), anyhow::Error> {
        let (_tmp, store) = setup_store().await;
        let existing = store.create(input("A", "a.com")).await?;

        let missing_id = store.update(input("B", "b.com")).await;
        assert!(matches!(missing_id, Err(ServiceError::Validation(_))));

        let missing_url = store
            .update(LinkInput { id: Some(existing.id.clone()), ..input("B", "") })
            .await;
        assert!(matches!(missing_url, Err(ServiceError::Validation(_))));

        let unknown = store
            .update(LinkInput { id: Some("nope".into()), ..input("B", "b.com") })
            .await;
        match unknown {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Link not found"),
            other => panic!("expected not found, got {other:?}"),
        }
        assert_eq!(store.list().await, vec![existing]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_404_once_gone() -> Result<(), anyhow::Error> {
        let (_tmp, store) = setup_store().await;
        let link = store.create(input("A", "a.com")).await?;

        assert!(matches!(store.delete("").await, Err(ServiceError::Validation(_))));
        store.delete(&link.id).await?;
        for _ in 0..3 {
            assert!(matches!(store.delete(&link.id).await, Err(ServiceError::NotFound(_))));
        }
        assert!(store.list().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn records_persist_across_store_instances() -> Result<(), anyhow::Error> {
        let tmp = TempDir::new("links_reload");
        let dir = tmp.path().join("links");
        let first = LinkStore::new(&dir).await?;
        let created = first.create(input("Notion", "notion.so")).await?;

        let second = LinkStore::new(&dir).await?;
        assert_eq!(second.get(&created.id).await, Some(created));

        let raw = fs::read_to_string(dir.join(LINKS_FILE)).await?;
        assert!(raw.contains("\"addedDate\""));
        Ok(())
    }
}
