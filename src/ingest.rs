use crate::core::error::{Result, SearchEngineError};
use crate::core::types::{DocId, FieldValue, IndexedDocument};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

fn html_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<[^>]+>").unwrap())
}

fn markdown_markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)(^#{1,6}\s*)|(\*\*|__|\*|_|`{1,3}|^>\s*|^-\s*)").unwrap())
}

/// Strips Markdown emphasis, heading, and list markers, leaving the plain
/// reading text behind.
pub fn from_markdown(id: impl Into<String>, raw: &str) -> IndexedDocument {
    let stripped = markdown_markup_pattern().replace_all(raw, "");
    document_from_text(id, &stripped)
}

/// Strips HTML tags, leaving only text content. Entities are left
/// unescaped; callers that need full entity decoding should pre-process.
pub fn from_html(id: impl Into<String>, raw: &str) -> IndexedDocument {
    let stripped = html_tag_pattern().replace_all(raw, " ");
    document_from_text(id, &stripped)
}

fn document_from_text(id: impl Into<String>, text: &str) -> IndexedDocument {
    let normalized: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut fields = HashMap::new();
    fields.insert("content".to_string(), FieldValue::Text(normalized));
    IndexedDocument::new(DocId::new(id.into()), fields)
}

/// Reads a single file and ingests it according to its extension.
/// Unsupported extensions are skipped rather than erroring, since a
/// directory walk will routinely contain non-document files.
pub fn ingest_path(path: &Path) -> Result<Option<IndexedDocument>> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let contents = std::fs::read_to_string(path).map_err(SearchEngineError::storage)?;

    let doc = match extension {
        "md" | "markdown" => Some(from_markdown(id, &contents)),
        "html" | "htm" => Some(from_html(id, &contents)),
        "txt" => Some(document_from_text(id, &contents)),
        other => {
            tracing::debug!(extension = other, path = %path.display(), "skipping unsupported file");
            None
        }
    };
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_tags() {
        let doc = from_html("d1", "<p>Hello <b>World</b></p>");
        let text = doc.joined_text();
        assert!(text.contains("Hello"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn strips_markdown_markers() {
        let doc = from_markdown("d1", "# Title\n**bold** and _italic_");
        let text = doc.joined_text();
        assert!(text.contains("Title"));
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
    }

    #[test]
    fn unsupported_extension_is_skipped() {
        let path = std::env::temp_dir().join("textsearch_ingest_test.bin");
        std::fs::write(&path, b"binary").unwrap();
        let result = ingest_path(&path).unwrap();
        assert!(result.is_none());
        let _ = std::fs::remove_file(&path);
    }
}
