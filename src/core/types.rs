use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque document identifier. Non-empty, unique within an engine instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId(id.to_string())
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document field value. Structurally typed per the source data's shape:
/// plain text, a list of text (tags), or a nested mapping flattened by
/// dotted path (`metadata.author.name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Nested(HashMap<String, FieldValue>),
}

impl FieldValue {
    /// Flatten this value into `(dotted.path, text)` pairs under `prefix`.
    /// Lists contribute one pair per element, all under the same path.
    pub fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        match self {
            FieldValue::Text(s) => out.push((prefix.to_string(), s.clone())),
            FieldValue::List(items) => {
                for item in items {
                    out.push((prefix.to_string(), item.clone()));
                }
            }
            FieldValue::Nested(map) => {
                for (key, value) in map {
                    let path = format!("{prefix}.{key}");
                    value.flatten_into(&path, out);
                }
            }
        }
    }
}

/// Flatten a document's `fields` map into `dotted.path -> text` pairs.
pub fn flatten_fields(fields: &HashMap<String, FieldValue>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (name, value) in fields {
        value.flatten_into(name, &mut out);
    }
    out
}

/// Free-form document metadata. Always carries `indexed`/`last_modified`
/// timestamps; other keys are caller-defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub indexed: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        DocumentMetadata {
            indexed: now,
            last_modified: now,
            extra: HashMap::new(),
        }
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A prior snapshot of a document's content, appended when versioning is
/// enabled in `Config::document_support`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub version: u32,
    pub content: String,
    pub modified: DateTime<Utc>,
    pub author: Option<String>,
    pub changelog: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationType {
    Reference,
    Parent,
    Child,
    Related,
}

impl RelationType {
    pub fn is_bidirectional(self) -> bool {
        matches!(self, RelationType::Reference | RelationType::Related)
    }
}

/// A directed edge between two documents, used by the scorer's document-link
/// graph. `Reference` and `Related` are bidirectional for ranking purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub source_id: DocId,
    pub target_id: DocId,
    pub relation_type: RelationType,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// The canonical record held by the `DocumentStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: DocId,
    pub fields: HashMap<String, FieldValue>,
    pub metadata: DocumentMetadata,
    pub versions: Vec<DocumentVersion>,
    pub relations: Vec<Relation>,
}

impl IndexedDocument {
    pub fn new(id: DocId, fields: HashMap<String, FieldValue>) -> Self {
        IndexedDocument {
            id,
            fields,
            metadata: DocumentMetadata::new(),
            versions: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Concatenated text of every indexed field, whitespace-joined; this is
    /// "d-text" in the scorer's TF-IDF computation.
    pub fn joined_text(&self) -> String {
        flatten_fields(&self.fields)
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A directed link between two documents, feeding PageRank-style rank
/// propagation. `Reference`/`Related` types are bidirectional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLink {
    pub source: DocId,
    pub target: DocId,
    pub link_type: RelationType,
    pub weight: f64,
    pub url: Option<String>,
}

/// One entry in a `SearchResult` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: DocId,
    pub score: f64,
    pub matches: Vec<String>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}
