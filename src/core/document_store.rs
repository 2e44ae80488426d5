use crate::core::error::{Result, SearchEngineError};
use crate::core::types::{DocId, IndexedDocument};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Holds canonical `IndexedDocument` records keyed by id. Source of truth
/// for field data; the `TokenIndex` only ever stores ids, never content.
pub struct DocumentStore {
    documents: RwLock<HashMap<DocId, IndexedDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, doc: IndexedDocument) {
        self.documents.write().insert(doc.id.clone(), doc);
    }

    pub fn get(&self, id: &DocId) -> Option<IndexedDocument> {
        self.documents.read().get(id).cloned()
    }

    pub fn contains(&self, id: &DocId) -> bool {
        self.documents.read().contains_key(id)
    }

    pub fn remove(&self, id: &DocId) -> Result<IndexedDocument> {
        self.documents
            .write()
            .remove(id)
            .ok_or_else(|| SearchEngineError::not_found(format!("document '{id}' not found")))
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.documents.write().clear();
    }

    pub fn all(&self) -> Vec<IndexedDocument> {
        self.documents.read().values().cloned().collect()
    }

    pub fn ids(&self) -> Vec<DocId> {
        self.documents.read().keys().cloned().collect()
    }

    pub fn replace_all(&self, docs: HashMap<DocId, IndexedDocument>) {
        *self.documents.write() = docs;
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
