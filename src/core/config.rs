use crate::core::error::{Result, SearchEngineError};
use crate::query::cache::EvictionStrategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    Memory,
    IndexedDb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStrategy {
    Simple,
    Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub storage_type: StorageType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            storage_type: StorageType::Memory,
        }
    }
}

/// Defaults applied to a `search()` call that doesn't specify its own
/// options, per `spec.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    pub fuzzy: bool,
    pub max_distance: u8,
    pub max_results: usize,
    pub threshold: f64,
    pub case_sensitive: bool,
    pub include_matches: bool,
    pub enable_regex: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        SearchDefaults {
            fuzzy: false,
            max_distance: 2,
            max_results: 50,
            threshold: 0.0,
            case_sensitive: false,
            include_matches: true,
            enable_regex: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingOptions {
    pub stemming: bool,
    pub case_sensitive: bool,
    pub stop_words: Option<Vec<String>>,
    pub min_word_length: usize,
    pub max_word_length: usize,
}

impl Default for IndexingOptions {
    fn default() -> Self {
        IndexingOptions {
            stemming: true,
            case_sensitive: false,
            stop_words: None,
            min_word_length: 1,
            max_word_length: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersioningConfig {
    pub enabled: bool,
    pub max_versions: usize,
    pub strategy: VersioningStrategy,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        VersioningConfig {
            enabled: false,
            max_versions: 10,
            strategy: VersioningStrategy::Simple,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSupportConfig {
    pub versioning: VersioningConfig,
}

impl Default for DocumentSupportConfig {
    fn default() -> Self {
        DocumentSupportConfig {
            versioning: VersioningConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_size: usize,
    pub ttl_minutes: i64,
    pub strategy: EvictionStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_size: 200,
            ttl_minutes: 15,
            strategy: EvictionStrategy::Lru,
        }
    }
}

/// Engine configuration, mirroring the recognized options in `spec.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    pub version: u32,
    pub fields: Vec<String>,
    pub storage: StorageConfig,
    pub search_defaults: SearchDefaults,
    pub indexing: IndexingOptions,
    pub document_support: DocumentSupportConfig,
    pub cache: CacheConfig,
}

impl Config {
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Config {
            name: name.into(),
            version: 1,
            fields,
            storage: StorageConfig::default(),
            search_defaults: SearchDefaults::default(),
            indexing: IndexingOptions::default(),
            document_support: DocumentSupportConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Validates the config, returning `ValidationError` on the first
    /// violated precondition from `spec.md` §6/§7.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SearchEngineError::validation("config.name must be non-empty"));
        }
        if self.fields.is_empty() {
            return Err(SearchEngineError::validation(
                "config.fields must be non-empty",
            ));
        }
        if !(0.0..=1.0).contains(&self.search_defaults.threshold) {
            return Err(SearchEngineError::validation(
                "config.search_defaults.threshold must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new("default-index", vec!["content".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        let mut config = Config::default();
        config.name = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_fields() {
        let mut config = Config::default();
        config.fields.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.search_defaults.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
