use crate::core::types::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Auxiliary reverse map from token to the documents that contain it. Kept
/// alongside `TokenIndex` so removal and export don't require walking the
/// trie to enumerate a token's postings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingMap {
    postings: HashMap<String, HashSet<DocId>>,
}

impl PostingMap {
    pub fn new() -> Self {
        PostingMap::default()
    }

    pub fn insert(&mut self, token: &str, doc_id: &DocId) {
        self.postings
            .entry(token.to_string())
            .or_default()
            .insert(doc_id.clone());
    }

    pub fn get(&self, token: &str) -> HashSet<DocId> {
        self.postings.get(token).cloned().unwrap_or_default()
    }

    pub fn remove_document(&mut self, doc_id: &DocId) {
        self.postings.retain(|_, docs| {
            docs.remove(doc_id);
            !docs.is_empty()
        });
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.postings.get(token).map(HashSet::len).unwrap_or(0)
    }

    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &String> {
        self.postings.keys()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_document_frequency() {
        let mut map = PostingMap::new();
        map.insert("rust", &DocId::new("d1"));
        map.insert("rust", &DocId::new("d2"));
        assert_eq!(map.document_frequency("rust"), 2);
    }

    #[test]
    fn remove_document_drops_empty_entries() {
        let mut map = PostingMap::new();
        map.insert("rust", &DocId::new("d1"));
        map.remove_document(&DocId::new("d1"));
        assert_eq!(map.document_frequency("rust"), 0);
        assert_eq!(map.token_count(), 0);
    }
}
