/// Demonstrates bulk document ingestion from disk and switching the result
/// cache's eviction strategy at runtime.
use std::collections::HashMap;
use std::path::Path;
use textsearch::core::config::Config;
use textsearch::core::types::{FieldValue, IndexedDocument};
use textsearch::engine::{SearchEngine, SearchOptions};
use textsearch::ingest;
use textsearch::query::cache::EvictionStrategy;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = Config::new("bulk-docs", vec!["content".to_string()]);
    config.cache.max_size = 50;
    config.cache.strategy = EvictionStrategy::Lru;

    let engine = SearchEngine::new(config)?;

    println!("Generating 1000 synthetic documents...");
    let docs: Vec<IndexedDocument> = (0..1000)
        .map(|i| {
            let mut fields = HashMap::new();
            fields.insert(
                "content".to_string(),
                FieldValue::Text(format!("Document {i} Lorem ipsum dolor sit amet")),
            );
            IndexedDocument::new(format!("doc-{i}").into(), fields)
        })
        .collect();

    let added = engine.add_documents(docs);
    println!("Indexed {} documents", added.len());

    println!("\nSwitching result cache to MRU eviction...");
    engine.set_cache_strategy(EvictionStrategy::Mru);

    for i in 0..10 {
        let query = format!("document {i}");
        let results = engine.search(&query, SearchOptions::default())?;
        println!("  '{query}': {} results", results.len());
    }

    let example_path = Path::new("README.md");
    if example_path.exists() {
        if let Some(doc) = ingest::ingest_path(example_path)? {
            println!("\nIngested {} from disk", doc.id);
        }
    }

    println!("\nFinal document count: {}", engine.len());
    Ok(())
}
