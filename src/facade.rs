use crate::core::error::{Result, SearchEngineError};
use crate::core::types::{IndexedDocument, SearchResult};
use crate::engine::{SearchEngine, SearchOptions};
use crate::ingest;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Current engine health, surfaced as the `GET /status` response shape.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub document_count: usize,
    pub uptime_seconds: u64,
    pub query_count: u64,
    pub write_count: u64,
}

/// Thin request/response wrapper around `SearchEngine`, shaped like the
/// three operations an HTTP layer would expose (`GET /search`,
/// `GET /status`, `POST /reindex`) without depending on any particular web
/// framework.
pub struct SearchService {
    engine: Arc<SearchEngine>,
}

impl SearchService {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        SearchService { engine }
    }

    pub fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>> {
        self.engine.search(query, options)
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            document_count: self.engine.len(),
            uptime_seconds: self.engine.uptime().as_secs(),
            query_count: self.engine.query_count(),
            write_count: self.engine.write_count(),
        }
    }

    /// `POST /reindex` contract: walks every file directly inside `directory`,
    /// ingesting each supported one (Markdown, HTML, plain text) and indexing
    /// the result. Unsupported extensions and subdirectories are skipped
    /// silently, matching `ingest::ingest_path`'s per-file contract. Returns
    /// the number of documents indexed.
    pub fn reindex(&self, directory: &Path) -> Result<usize> {
        let mut docs = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(SearchEngineError::storage)? {
            let entry = entry.map_err(SearchEngineError::storage)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(doc) = ingest::ingest_path(&path)? {
                docs.push(doc);
            }
        }
        let added = docs.len();
        self.engine.add_documents(docs);
        Ok(added)
    }

    pub fn add_documents(&self, docs: Vec<IndexedDocument>) -> Vec<crate::core::types::DocId> {
        self.engine.add_documents(docs)
    }
}
