/// Complete textsearch API walkthrough: indexing, searching (exact, fuzzy,
/// field-scoped), updating, removing, reindexing from disk, and inspecting
/// engine status.
use std::collections::HashMap;
use std::sync::Arc;
use textsearch::core::config::Config;
use textsearch::core::types::{DocId, FieldValue, IndexedDocument};
use textsearch::engine::{SearchEngine, SearchOptions};
use textsearch::facade::SearchService;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        textsearch - Complete API Demo          ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    println!("Creating engine...");
    let config = Config::new("docs", vec!["title".to_string(), "content".to_string()]);
    let engine = Arc::new(SearchEngine::new(config)?);
    let service = SearchService::new(engine.clone());
    println!("Done!\n");

    println!("Step 1: INSERT - Adding documents...");
    let added = service.add_documents(vec![
        document("doc1", "Rust Programming", "Learn the Rust language"),
        document("doc2", "Database Systems", "SQL and NoSQL databases"),
        document("doc3", "Web Development", "Building web apps"),
    ]);
    println!("  Inserted {} documents\n", added.len());

    println!("Step 2: SEARCH - Querying documents...");
    let exact = service.search("rust", SearchOptions::default())?;
    println!("  'rust': {} results", exact.len());

    let fuzzy_options = SearchOptions {
        fuzzy: Some(true),
        max_distance: Some(2),
        ..Default::default()
    };
    let fuzzy = service.search("databse", fuzzy_options)?;
    println!("  'databse' (fuzzy): {} results", fuzzy.len());

    let field_scoped = service.search("title:web", SearchOptions::default())?;
    println!("  'title:web': {} results\n", field_scoped.len());

    println!("Step 3: UPDATE - Replacing document content...");
    let mut updated_fields = HashMap::new();
    updated_fields.insert(
        "title".to_string(),
        FieldValue::Text("Advanced Databases".to_string()),
    );
    updated_fields.insert(
        "content".to_string(),
        FieldValue::Text("Deep dive into database internals".to_string()),
    );
    engine.update_document(&DocId::new("doc2"), updated_fields)?;
    println!("  Updated document 'doc2'\n");

    println!("Step 4: DELETE - Removing a document...");
    engine.remove_document(&DocId::new("doc3"))?;
    println!("  Removed document 'doc3'\n");

    println!("Step 5: REINDEX - Ingesting files from a directory...");
    let reindex_dir = std::env::temp_dir().join("textsearch-demo-reindex");
    std::fs::create_dir_all(&reindex_dir)?;
    std::fs::write(reindex_dir.join("notes.md"), "# Notes\nRemember to benchmark the trie")?;
    let indexed = service.reindex(&reindex_dir)?;
    println!("  Indexed {indexed} document(s) from {}\n", reindex_dir.display());

    println!("Step 6: STATUS - Engine metrics:");
    println!("  ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let status = service.status();
    println!("  Document count:  {}", status.document_count);
    println!("  Uptime (secs):   {}", status.uptime_seconds);
    println!("  Query count:     {}", status.query_count);
    println!("  Write count:     {}", status.write_count);

    println!("\n╔════════════════════════════════════════╗");
    println!("║    All API Operations Completed!        ║");
    println!("╚════════════════════════════════════════╝\n");

    Ok(())
}

fn document(id: &str, title: &str, content: &str) -> IndexedDocument {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), FieldValue::Text(title.to_string()));
    fields.insert("content".to_string(), FieldValue::Text(content.to_string()));
    IndexedDocument::new(DocId::new(id), fields)
}
