use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use textsearch::core::config::Config;
use textsearch::core::types::{DocId, FieldValue, IndexedDocument};
use textsearch::engine::{SearchEngine, SearchOptions};

fn create_test_document(id: u64, content_size: usize) -> IndexedDocument {
    let mut rng = rand::thread_rng();
    let content: String = (0..content_size)
        .map(|_| {
            let words = ["the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog"];
            words[rng.gen_range(0..words.len())]
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut fields = HashMap::new();
    fields.insert("title".to_string(), FieldValue::Text(format!("Document {id}")));
    fields.insert("content".to_string(), FieldValue::Text(content));
    fields.insert(
        "category".to_string(),
        FieldValue::Text(format!("category_{}", id % 10)),
    );
    IndexedDocument::new(DocId::new(format!("doc-{id}")), fields)
}

fn bench_single_insert(c: &mut Criterion) {
    let engine = Arc::new(SearchEngine::new(Config::default()).unwrap());

    c.bench_function("single_document_insert", |b| {
        let mut id = 0;
        b.iter(|| {
            let doc = create_test_document(id, 100);
            engine.add_documents(vec![doc]);
            id += 1;
        });
    });
}

fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_insert");

    for batch_size in [10, 50, 100, 500, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                let engine = SearchEngine::new(Config::default()).unwrap();
                let mut id_counter = 0u64;

                b.iter(|| {
                    let docs: Vec<IndexedDocument> = (0..batch_size)
                        .map(|_| {
                            let doc = create_test_document(id_counter, 100);
                            id_counter += 1;
                            doc
                        })
                        .collect();
                    engine.add_documents(docs);
                });
            },
        );
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let engine = Arc::new(SearchEngine::new(Config::default()).unwrap());

    let docs: Vec<IndexedDocument> = (0..1000).map(|i| create_test_document(i, 100)).collect();
    engine.add_documents(docs);

    let mut group = c.benchmark_group("search");

    group.bench_function("exact_term_search", |b| {
        b.iter(|| {
            let _ = engine
                .search(black_box("fox"), SearchOptions::default())
                .unwrap_or_default();
        });
    });

    let fuzzy_options = SearchOptions {
        fuzzy: Some(true),
        max_distance: Some(2),
        ..Default::default()
    };
    group.bench_function("fuzzy_search_distance_2", |b| {
        b.iter(|| {
            let _ = engine
                .search(black_box("brwn"), fuzzy_options.clone())
                .unwrap_or_default();
        });
    });

    group.bench_function("phrase_query", |b| {
        b.iter(|| {
            let _ = engine
                .search(black_box("\"quick brown fox\""), SearchOptions::default())
                .unwrap_or_default();
        });
    });

    group.bench_function("field_scoped_query", |b| {
        b.iter(|| {
            let _ = engine
                .search(black_box("category:category_5"), SearchOptions::default())
                .unwrap_or_default();
        });
    });

    group.finish();
}

fn bench_cache_hit_rate(c: &mut Criterion) {
    let engine = Arc::new(SearchEngine::new(Config::default()).unwrap());
    let docs: Vec<IndexedDocument> = (0..1000).map(|i| create_test_document(i, 100)).collect();
    engine.add_documents(docs);

    let mut group = c.benchmark_group("cache");
    group.bench_function("repeated_query", |b| {
        b.iter(|| {
            let _ = engine.search(black_box("fox"), SearchOptions::default());
        });
    });
    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("index_throughput", |b| {
        b.iter_custom(|iters| {
            let engine = SearchEngine::new(Config::default()).unwrap();
            let mut id = 0;

            let start = Instant::now();
            for _ in 0..iters {
                let docs: Vec<IndexedDocument> = (0..100)
                    .map(|_| {
                        let doc = create_test_document(id, 100);
                        id += 1;
                        doc
                    })
                    .collect();
                engine.add_documents(docs);
            }
            start.elapsed()
        });
    });

    group.bench_function("query_throughput", |b| {
        let engine = SearchEngine::new(Config::default()).unwrap();
        let docs: Vec<IndexedDocument> = (0..5000).map(|i| create_test_document(i, 50)).collect();
        engine.add_documents(docs);

        let queries = ["fox", "quick brown", "lazy dog", "category:category_5"];
        let mut query_idx = 0;

        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..100 {
                    let _ = engine
                        .search(queries[query_idx % queries.len()], SearchOptions::default())
                        .unwrap_or_default();
                    query_idx += 1;
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_insert,
    bench_batch_insert,
    bench_search,
    bench_cache_hit_rate,
    bench_throughput
);
criterion_main!(benches);
