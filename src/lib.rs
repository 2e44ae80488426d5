pub mod analysis;
pub mod core;
pub mod engine;
pub mod facade;
pub mod index;
pub mod ingest;
pub mod query;
pub mod scoring;
pub mod snapshot;

/*
┌──────────────────────────────────────────────────────────────────────┐
│                              SearchEngine                            │
│  documents: DocumentStore        canonical field data, by DocId      │
│  index: TokenIndex               char-trie, exact/prefix/fuzzy        │
│  postings: PostingMap            token -> doc set, for idf + removal  │
│  links: Vec<DocumentLink>        feeds PageRank-style rank scoring    │
│  cache: ResultCache              LRU/MRU, TTL-bounded                 │
└──────────────────────────────────────────────────────────────────────┘
        │                 │                  │                │
        ▼                 ▼                  ▼                ▼
 core::document_store  index::trie     scoring::{scorer,   query::cache
                        index::        pagerank}
                        posting_map

 analysis::{tokenizer, stopwords, stemmer}  feed indexing and querying
 query::processor                          classifies raw query text
 snapshot::SnapshotStore                   durable export/import contract
 facade::SearchService                     search / status / reindex surface
 ingest::{from_markdown, from_html, ingest_path}  plain-text extraction
*/
