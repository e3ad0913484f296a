// src/store.rs
//! Article storage boundary. The records are owned by an external
//! collaborator; this engine only reads them. A failed read is the one
//! batch-level fatal error the API surfaces.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::types::ArticleRecord;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load all scoreable (non-archived) records.
    async fn load(&self) -> Result<Vec<ArticleRecord>>;
}

/// Reads a JSON array of records from disk on every call, so the external
/// owner can swap the file between batch runs.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<ArticleRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading article store at {}", self.path.display()))?;
        let records: Vec<ArticleRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing article store at {}", self.path.display()))?;
        Ok(records.into_iter().filter(|r| !r.is_archived()).collect())
    }
}

/// Fixed in-memory records; used by tests and demos.
pub struct MemoryStore {
    records: Vec<ArticleRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<ArticleRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ArticleRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| !r.is_archived())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, archived: bool) -> ArticleRecord {
        ArticleRecord {
            id: id.into(),
            saved_at: 1,
            archived_at: archived.then_some(2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn memory_store_filters_archived_records() {
        let store = MemoryStore::new(vec![rec("a", false), rec("b", true), rec("c", false)]);
        let loaded = store.load().await.unwrap();
        let ids: Vec<&str> = loaded.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn json_store_missing_file_is_an_error() {
        let store = JsonFileStore::new("/definitely/not/here.json");
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn json_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "readrank_store_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("articles.json");
        let records = vec![rec("a", false), rec("b", true)];
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let store = JsonFileStore::new(&path);
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
