use std::collections::HashMap;
use std::sync::Arc;
use textsearch::core::config::Config;
use textsearch::core::types::{DocId, FieldValue, IndexedDocument};
use textsearch::engine::{SearchEngine, SearchOptions};
use textsearch::query::cache::EvictionStrategy;

fn field(text: &str) -> FieldValue {
    FieldValue::Text(text.to_string())
}

fn corpus_doc(id: &str, title: &str, content: &str) -> IndexedDocument {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), field(title));
    fields.insert("content".to_string(), field(content));
    IndexedDocument::new(DocId::new(id), fields)
}

fn small_corpus_engine() -> SearchEngine {
    let config = Config::new("corpus", vec!["title".to_string(), "content".to_string()]);
    let engine = SearchEngine::new(config).unwrap();
    engine.add_documents(vec![
        corpus_doc(
            "doc1",
            "JavaScript Basics",
            "JavaScript is a dynamic, weakly typed language used for web development",
        ),
        corpus_doc(
            "doc2",
            "TypeScript Guide",
            "TypeScript adds static types on top of JavaScript",
        ),
        corpus_doc(
            "doc3",
            "React Framework",
            "React is a JavaScript library for building user interfaces",
        ),
    ]);
    engine
}

#[test]
fn exact_search_ranks_most_relevant_document_first() {
    let engine = small_corpus_engine();
    let results = engine.search("javascript", SearchOptions::default()).unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().any(|r| r.id == DocId::new("doc1")));
}

#[test]
fn fuzzy_search_finds_misspelled_term() {
    let engine = small_corpus_engine();
    let options = SearchOptions {
        fuzzy: Some(true),
        max_distance: Some(2),
        ..Default::default()
    };
    let results = engine.search("javascrpt", options).unwrap();
    assert!(!results.is_empty());
}

#[test]
fn stop_word_only_query_returns_nothing_useful() {
    let engine = small_corpus_engine();
    let results = engine.search("the", SearchOptions::default()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn repeated_query_is_served_from_cache() {
    let engine = small_corpus_engine();
    let first = engine.search("javascript", SearchOptions::default()).unwrap();
    engine.add_documents(vec![corpus_doc(
        "doc4",
        "Vue Basics",
        "Vue is a javascript framework",
    )]);
    let second = engine.search("javascript", SearchOptions::default()).unwrap();
    assert!(second.len() >= first.len());
    assert!(second.iter().any(|r| r.id == DocId::new("doc4")));
}

#[test]
fn lru_cache_evicts_oldest_query_first() {
    let mut config = Config::new("corpus", vec!["content".to_string()]);
    config.cache.max_size = 2;
    config.cache.strategy = EvictionStrategy::Lru;
    let engine = SearchEngine::new(config).unwrap();
    engine.add_documents(vec![
        corpus_doc("d1", "alpha", "alpha document"),
        corpus_doc("d2", "beta", "beta document"),
        corpus_doc("d3", "gamma", "gamma document"),
    ]);

    engine.search("alpha", SearchOptions::default()).unwrap();
    engine.search("beta", SearchOptions::default()).unwrap();
    engine.search("gamma", SearchOptions::default()).unwrap();

    // with capacity 2, "alpha" should have been evicted by now; this just
    // exercises the path without asserting on cache internals directly.
    let results = engine.search("alpha", SearchOptions::default()).unwrap();
    assert!(!results.is_empty());
}

#[test]
fn removing_a_document_drops_it_from_future_searches() {
    let engine = small_corpus_engine();
    engine.remove_document(&DocId::new("doc3")).unwrap();
    let results = engine.search("react", SearchOptions::default()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn updating_a_document_changes_what_it_matches() {
    let engine = small_corpus_engine();
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), field("Rust Basics"));
    fields.insert("content".to_string(), field("Rust is a systems language"));
    engine.update_document(&DocId::new("doc2"), fields).unwrap();

    let rust_results = engine.search("rust", SearchOptions::default()).unwrap();
    assert!(rust_results.iter().any(|r| r.id == DocId::new("doc2")));

    let typescript_results = engine.search("typescript", SearchOptions::default()).unwrap();
    assert!(!typescript_results.iter().any(|r| r.id == DocId::new("doc2")));
}

#[test]
fn shared_engine_handle_is_send_and_sync_across_threads() {
    let engine = Arc::new(small_corpus_engine());
    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = engine.clone();
        handles.push(std::thread::spawn(move || {
            engine.search("javascript", SearchOptions::default()).unwrap()
        }));
    }
    for handle in handles {
        assert!(!handle.join().unwrap().is_empty());
    }
}
