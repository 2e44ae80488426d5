use thiserror::Error;

/// The error taxonomy for the engine's public operations. Per-document
/// indexing failures during batch `add_documents` are recovered locally and
/// never surface as this type (see `engine::SearchEngine::add_documents`);
/// everything else that can fail returns one of these kinds.
#[derive(Debug, Error)]
pub enum SearchEngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("search error: {0}")]
    Search(String),

    #[error("cache error: {0}")]
    Cache(String),
}

impl SearchEngineError {
    pub fn validation(context: impl Into<String>) -> Self {
        SearchEngineError::Validation(context.into())
    }

    pub fn not_found(context: impl Into<String>) -> Self {
        SearchEngineError::NotFound(context.into())
    }

    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SearchEngineError::Storage(Box::new(err))
    }

    pub fn search(context: impl Into<String>) -> Self {
        SearchEngineError::Search(context.into())
    }

    pub fn cache(context: impl Into<String>) -> Self {
        SearchEngineError::Cache(context.into())
    }
}

pub type Result<T> = std::result::Result<T, SearchEngineError>;
