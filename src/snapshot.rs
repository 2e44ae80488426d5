use crate::core::error::{Result, SearchEngineError};
use crate::core::types::{DocId, IndexedDocument};
use crate::index::posting_map::PostingMap;
use crate::index::trie::TokenIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// On-disk shape of one index snapshot: documents, the trie, and the
/// auxiliary posting map, versioned so a restore can detect a schema
/// mismatch before deserializing the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexBlob {
    pub version: u32,
    pub config_name: String,
    pub documents: Vec<(DocId, IndexedDocument)>,
    pub token_index: TokenIndex,
    pub posting_map: PostingMap,
}

/// Free-form per-index metadata, kept in a separate object store from the
/// blob itself so callers can query/update metadata without touching the
/// (much larger) index payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub document_count: usize,
    pub last_snapshot: Option<chrono::DateTime<chrono::Utc>>,
    pub extra: HashMap<String, serde_json::Value>,
}

/// Durable storage contract for search indices, mirroring a two-object-store
/// schema (`searchIndices`, `metadata`) each keyed by index name. The only
/// implementation shipped here is in-memory; the trait is shaped so a
/// persistent backend (e.g. an IndexedDB-style store) can be dropped in
/// without touching the engine.
pub trait SnapshotStore: Send + Sync {
    async fn initialize(&self) -> Result<()>;
    async fn store_index(&self, name: &str, blob: SearchIndexBlob) -> Result<()>;
    async fn get_index(&self, name: &str) -> Result<Option<SearchIndexBlob>>;
    async fn update_metadata(&self, name: &str, metadata: IndexMetadata) -> Result<()>;
    async fn get_metadata(&self, name: &str) -> Result<Option<IndexMetadata>>;
    async fn delete_index(&self, name: &str) -> Result<()>;
    async fn clear_indices(&self) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

#[derive(Default)]
struct Store {
    indices: HashMap<String, SearchIndexBlob>,
    metadata: HashMap<String, IndexMetadata>,
}

/// Default `SnapshotStore` backend: everything lives in process memory and
/// is lost on shutdown. Useful for tests and for callers who handle
/// persistence themselves via `export_index`/`import_index`.
pub struct InMemorySnapshotStore {
    store: RwLock<Store>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        InMemorySnapshotStore {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn store_index(&self, name: &str, blob: SearchIndexBlob) -> Result<()> {
        self.store.write().await.indices.insert(name.to_string(), blob);
        Ok(())
    }

    async fn get_index(&self, name: &str) -> Result<Option<SearchIndexBlob>> {
        Ok(self.store.read().await.indices.get(name).cloned())
    }

    async fn update_metadata(&self, name: &str, metadata: IndexMetadata) -> Result<()> {
        self.store.write().await.metadata.insert(name.to_string(), metadata);
        Ok(())
    }

    async fn get_metadata(&self, name: &str) -> Result<Option<IndexMetadata>> {
        Ok(self.store.read().await.metadata.get(name).cloned())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.indices.remove(name);
        store.metadata.remove(name);
        Ok(())
    }

    async fn clear_indices(&self) -> Result<()> {
        let mut store = self.store.write().await;
        store.indices.clear();
        store.metadata.clear();
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

pub fn validate_blob_version(blob: &SearchIndexBlob, expected: u32) -> Result<()> {
    if blob.version != expected {
        return Err(SearchEngineError::storage(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "snapshot version mismatch: expected {expected}, found {}",
                blob.version
            ),
        )));
    }
    Ok(())
}
