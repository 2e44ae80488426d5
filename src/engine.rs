use crate::analysis::stopwords::filter_stop_words;
use crate::analysis::tokenizer::tokenize;
use crate::core::config::Config;
use crate::core::document_store::DocumentStore;
use crate::core::error::{Result, SearchEngineError};
use crate::core::types::{DocId, DocumentLink, FieldValue, IndexedDocument, SearchResult};
use crate::index::posting_map::PostingMap;
use crate::index::trie::TokenIndex;
use crate::query::cache::{CacheKey, EvictionStrategy, ResultCache};
use crate::query::processor::{QueryProcessor, QueryToken};
use crate::scoring::pagerank::rank_documents;
use crate::scoring::scorer::{
    apply_freshness, combined_score, inverse_document_frequency, ordering_key, term_frequency,
    text_match_score, TermStats, DEFAULT_MAX_AGE_DAYS,
};
use crate::snapshot::{validate_blob_version, SearchIndexBlob};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use uuid::Uuid;

/// Schema version stamped on every `SearchIndexBlob` this engine produces.
const SNAPSHOT_VERSION: u32 = 1;

/// Options accepted by a single `search()` call, overriding `Config::search_defaults`
/// where set.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub fuzzy: Option<bool>,
    pub max_distance: Option<u8>,
    pub max_results: Option<usize>,
    pub threshold: Option<f64>,
    pub case_sensitive: Option<bool>,
    pub include_matches: Option<bool>,
}

/// Orchestrates the document store, trie index, posting map, scorer, and
/// result cache behind a single API. Collaborators are each independently
/// locked so reads of unrelated state never block on each other.
pub struct SearchEngine {
    config: RwLock<Config>,
    documents: DocumentStore,
    index: RwLock<TokenIndex>,
    postings: RwLock<PostingMap>,
    links: RwLock<Vec<DocumentLink>>,
    cache: RwLock<ResultCache>,
    started_at: Instant,
    query_count: AtomicU64,
    write_count: AtomicU64,
}

impl SearchEngine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let cache = ResultCache::new(
            config.cache.max_size,
            config.cache.ttl_minutes,
            config.cache.strategy,
        );
        Ok(SearchEngine {
            config: RwLock::new(config),
            documents: DocumentStore::new(),
            index: RwLock::new(TokenIndex::new()),
            postings: RwLock::new(PostingMap::new()),
            links: RwLock::new(Vec::new()),
            cache: RwLock::new(cache),
            started_at: Instant::now(),
            query_count: AtomicU64::new(0),
            write_count: AtomicU64::new(0),
        })
    }

    /// Indexes each document, assigning an id when absent. Per-document
    /// failures (empty field set, duplicate explicit id) are logged and
    /// skipped rather than aborting the whole batch.
    pub fn add_documents(&self, docs: Vec<IndexedDocument>) -> Vec<DocId> {
        let mut added = Vec::with_capacity(docs.len());
        let config = self.config.read();
        let index_name = config.name.clone();
        drop(config);

        for mut doc in docs {
            if doc.fields.is_empty() {
                tracing::warn!(doc_id = %doc.id, "skipping document with no fields");
                continue;
            }
            if doc.id.as_str().is_empty() {
                doc.id = generate_doc_id(&index_name);
            }
            if self.documents.contains(&doc.id) {
                tracing::warn!(doc_id = %doc.id, "skipping duplicate document id");
                continue;
            }

            self.index_document_tokens(&doc);
            added.push(doc.id.clone());
            self.documents.insert(doc);
        }

        if !added.is_empty() {
            self.write_count.fetch_add(added.len() as u64, Ordering::Relaxed);
            self.cache.write().clear();
        }
        added
    }

    fn index_document_tokens(&self, doc: &IndexedDocument) {
        let config = self.config.read();
        let stop_words = config.indexing.stop_words.clone().unwrap_or_default();
        let stemming = config.indexing.stemming;
        drop(config);

        let words = self.doc_words_for(doc, &stop_words, stemming);
        let mut index = self.index.write();
        let mut postings = self.postings.write();
        for word in &words {
            index.insert(word, &doc.id, 1.0);
            postings.insert(word, &doc.id);
        }
    }

    fn doc_words_for(&self, doc: &IndexedDocument, stop_words: &[String], stemming: bool) -> Vec<String> {
        let text = doc.joined_text();
        let tokens = tokenize(&text);
        let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let filtered = filter_stop_words(refs, stop_words);
        if stemming {
            filtered.into_iter().map(|t| crate::analysis::stemmer::stem(&t)).collect()
        } else {
            filtered
        }
    }

    /// Replaces a document's content wholesale, re-indexing its tokens and
    /// optionally appending the prior content as a version.
    pub fn update_document(&self, id: &DocId, fields: HashMap<String, FieldValue>) -> Result<()> {
        let existing = self
            .documents
            .get(id)
            .ok_or_else(|| SearchEngineError::not_found(format!("document '{id}' not found")))?;

        {
            let mut index = self.index.write();
            let mut postings = self.postings.write();
            index.remove(id);
            postings.remove_document(id);
        }

        let mut updated = existing.clone();
        let config = self.config.read();
        let versioning = config.document_support.versioning.clone();
        drop(config);

        if versioning.enabled {
            updated.versions.push(crate::core::types::DocumentVersion {
                version: updated.versions.len() as u32 + 1,
                content: existing.joined_text(),
                modified: existing.metadata.last_modified,
                author: None,
                changelog: None,
            });
            if updated.versions.len() > versioning.max_versions {
                let overflow = updated.versions.len() - versioning.max_versions;
                updated.versions.drain(0..overflow);
            }
        }

        updated.fields = fields;
        updated.metadata.last_modified = chrono::Utc::now();

        self.index_document_tokens(&updated);
        self.documents.insert(updated);
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.cache.write().clear();
        Ok(())
    }

    pub fn remove_document(&self, id: &DocId) -> Result<()> {
        self.documents.remove(id)?;
        self.index.write().remove(id);
        self.postings.write().remove_document(id);
        self.links.write().retain(|l| &l.source != id && &l.target != id);
        self.cache.write().clear();
        Ok(())
    }

    pub fn add_link(&self, link: DocumentLink) {
        self.links.write().push(link);
    }

    /// Classifies `raw_query` via `QueryProcessor` (terms, phrases, `+required`/
    /// `-excluded`/`!negated` modifiers, `field:value` scoping), resolves each
    /// token against the trie (exact, then fuzzy and prefix candidates),
    /// scores the surviving documents, and returns results ordered by
    /// descending score (ties broken by `last_modified` then id, ascending).
    pub fn search(&self, raw_query: &str, options: SearchOptions) -> Result<Vec<SearchResult>> {
        if raw_query.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.query_count.fetch_add(1, Ordering::Relaxed);
        let config = self.config.read();
        let defaults = config.search_defaults.clone();
        drop(config);

        let fuzzy = options.fuzzy.unwrap_or(defaults.fuzzy);
        let max_distance = options.max_distance.unwrap_or(defaults.max_distance);
        let max_results = options.max_results.unwrap_or(defaults.max_results);
        let threshold = options.threshold.unwrap_or(defaults.threshold);

        let cache_key = CacheKey {
            normalized_query: raw_query.trim().to_lowercase(),
            fuzzy,
            max_distance,
            max_results,
            threshold_bits: (threshold * 1_000_000.0).round() as i64,
            case_sensitive: options.case_sensitive.unwrap_or(defaults.case_sensitive),
            enable_regex: defaults.enable_regex,
        };

        if let Some(cached) = self.cache.write().get(&cache_key) {
            return Ok(cached);
        }

        let query_tokens = QueryProcessor::new().process(raw_query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut per_doc_terms: HashMap<DocId, Vec<TermStats>> = HashMap::new();
        let mut matched_terms: HashMap<DocId, Vec<String>> = HashMap::new();
        let mut required_terms: Vec<String> = Vec::new();
        let mut excluded_terms: Vec<String> = Vec::new();
        let total_docs = self.documents.len().max(1);

        for token in &query_tokens {
            match token {
                QueryToken::Term(term) => {
                    self.accumulate_term(term, fuzzy, max_distance, total_docs, &mut per_doc_terms, &mut matched_terms);
                }
                QueryToken::Required(term) => {
                    required_terms.push(term.clone());
                    self.accumulate_term(term, fuzzy, max_distance, total_docs, &mut per_doc_terms, &mut matched_terms);
                }
                QueryToken::Excluded(term) | QueryToken::Negated(term) => {
                    excluded_terms.push(term.clone());
                }
                QueryToken::Phrase(phrase) => {
                    self.accumulate_phrase(phrase, &mut per_doc_terms, &mut matched_terms);
                }
                QueryToken::Field { name, value } => {
                    self.accumulate_field(name, value, &mut per_doc_terms, &mut matched_terms);
                }
            }
        }

        if !required_terms.is_empty() || !excluded_terms.is_empty() {
            let documents = &self.documents;
            per_doc_terms.retain(|doc_id, _| {
                let Some(doc) = documents.get(doc_id) else {
                    return false;
                };
                let doc_terms: Vec<String> = tokenize(&doc.joined_text())
                    .into_iter()
                    .map(|t| crate::analysis::stemmer::stem(&t))
                    .collect();
                let has_all_required = required_terms.iter().all(|t| doc_terms.contains(t));
                let has_any_excluded = excluded_terms.iter().any(|t| doc_terms.contains(t));
                has_all_required && !has_any_excluded
            });
        }

        let doc_ids = self.documents.ids();
        let links = self.links.read().clone();
        let ranks = rank_documents(&doc_ids, &links);
        let max_rank = ranks.values().cloned().fold(0.0_f64, f64::max).max(1e-9);

        let mut scored: Vec<(SearchResult, IndexedDocument)> = Vec::new();
        for (doc_id, stats) in &per_doc_terms {
            let Some(doc) = self.documents.get(doc_id) else {
                continue;
            };
            let text_match = text_match_score(stats);
            let avg_idf = stats.iter().map(|s| s.inverse_document_frequency).sum::<f64>()
                / stats.len().max(1) as f64;
            let avg_tf = stats.iter().map(|s| s.term_frequency).sum::<f64>() / stats.len().max(1) as f64;
            let normalized_rank = ranks.get(doc_id).copied().unwrap_or(0.0) / max_rank;

            let mut score = combined_score(text_match, normalized_rank, avg_tf * avg_idf);
            score = apply_freshness(score, &doc, DEFAULT_MAX_AGE_DAYS);

            if score < threshold {
                continue;
            }

            let result = SearchResult {
                id: doc_id.clone(),
                score,
                matches: matched_terms.get(doc_id).cloned().unwrap_or_default(),
                metadata: Some(doc.metadata.extra.clone()),
            };
            scored.push((result, doc));
        }

        scored.sort_by(|(result_a, doc_a), (result_b, doc_b)| {
            ordering_key(doc_a, result_a.score).cmp(&ordering_key(doc_b, result_b.score))
        });
        scored.truncate(max_results);
        let results: Vec<SearchResult> = scored.into_iter().map(|(result, _)| result).collect();

        self.cache.write().put(cache_key, results.clone());
        Ok(results)
    }

    /// Resolves a single stemmed term against the trie: exact hits score at
    /// full weight, fuzzy and prefix hits (deduplicated against the exact set)
    /// score at the reduced "fuzzy/prefix" base.
    fn accumulate_term(
        &self,
        term: &str,
        fuzzy: bool,
        max_distance: u8,
        total_docs: usize,
        per_doc_terms: &mut HashMap<DocId, Vec<TermStats>>,
        matched_terms: &mut HashMap<DocId, Vec<String>>,
    ) {
        let postings = self.postings.read();
        let doc_freq = postings.document_frequency(term);
        drop(postings);
        let idf = inverse_document_frequency(total_docs, doc_freq);

        let mut index = self.index.write();
        let exact_hits = index.search(term);
        let fuzzy_hits = if fuzzy {
            index.fuzzy_search(term, max_distance)
        } else {
            Default::default()
        };
        let prefix_hits = index.prefix_search(term);
        drop(index);

        for doc_id in exact_hits.iter() {
            self.push_term_stats(doc_id, term, idf, true, per_doc_terms, matched_terms);
        }

        let mut non_exact: std::collections::HashSet<DocId> = fuzzy_hits;
        non_exact.extend(prefix_hits);
        for doc_id in non_exact.iter() {
            if exact_hits.contains(doc_id) {
                continue;
            }
            self.push_term_stats(doc_id, term, idf, false, per_doc_terms, matched_terms);
        }
    }

    fn push_term_stats(
        &self,
        doc_id: &DocId,
        term: &str,
        idf: f64,
        matched_exactly: bool,
        per_doc_terms: &mut HashMap<DocId, Vec<TermStats>>,
        matched_terms: &mut HashMap<DocId, Vec<String>>,
    ) {
        let doc_words = self
            .documents
            .get(doc_id)
            .map(|d| tokenize(&d.joined_text()))
            .unwrap_or_default();
        let tf = term_frequency(term, &doc_words);
        per_doc_terms.entry(doc_id.clone()).or_default().push(TermStats {
            term_frequency: tf,
            inverse_document_frequency: idf,
            matched_exactly,
            matched_fuzzy_or_prefix: !matched_exactly,
        });
        matched_terms.entry(doc_id.clone()).or_default().push(term.to_string());
    }

    /// Credits every document whose token stream contains `phrase`'s words as
    /// a contiguous run. There's no positional index backing this, so it's a
    /// full scan over the corpus rather than a trie lookup.
    fn accumulate_phrase(
        &self,
        phrase: &str,
        per_doc_terms: &mut HashMap<DocId, Vec<TermStats>>,
        matched_terms: &mut HashMap<DocId, Vec<String>>,
    ) {
        let phrase_tokens = tokenize(phrase);
        if phrase_tokens.is_empty() {
            return;
        }

        for doc in self.documents.all() {
            let doc_tokens = tokenize(&doc.joined_text());
            if phrase_tokens.len() > doc_tokens.len() {
                continue;
            }
            let occurrences = doc_tokens
                .windows(phrase_tokens.len())
                .filter(|window| window == &phrase_tokens.as_slice())
                .count();
            if occurrences == 0 {
                continue;
            }
            let tf = occurrences as f64 / doc_tokens.len() as f64;
            per_doc_terms.entry(doc.id.clone()).or_default().push(TermStats {
                term_frequency: tf,
                inverse_document_frequency: 0.0,
                matched_exactly: true,
                matched_fuzzy_or_prefix: false,
            });
            matched_terms.entry(doc.id.clone()).or_default().push(phrase.to_string());
        }
    }

    /// Restricts a match to the named field: the field's flattened text must
    /// contain `value`'s tokens as a contiguous run.
    fn accumulate_field(
        &self,
        name: &str,
        value: &str,
        per_doc_terms: &mut HashMap<DocId, Vec<TermStats>>,
        matched_terms: &mut HashMap<DocId, Vec<String>>,
    ) {
        let value_tokens = tokenize(value);
        if value_tokens.is_empty() {
            return;
        }

        for doc in self.documents.all() {
            let Some(field_value) = doc.fields.get(name) else {
                continue;
            };
            let mut pairs = Vec::new();
            field_value.flatten_into(name, &mut pairs);
            let field_tokens: Vec<String> = pairs.iter().flat_map(|(_, text)| tokenize(text)).collect();
            if field_tokens.is_empty() || value_tokens.len() > field_tokens.len() {
                continue;
            }
            let occurrences = field_tokens
                .windows(value_tokens.len())
                .filter(|window| window == &value_tokens.as_slice())
                .count();
            if occurrences == 0 {
                continue;
            }
            let tf = occurrences as f64 / field_tokens.len() as f64;
            per_doc_terms.entry(doc.id.clone()).or_default().push(TermStats {
                term_frequency: tf,
                inverse_document_frequency: 0.0,
                matched_exactly: true,
                matched_fuzzy_or_prefix: false,
            });
            matched_terms
                .entry(doc.id.clone())
                .or_default()
                .push(format!("{name}:{value}"));
        }
    }

    /// Snapshots the engine's live state (documents, trie, posting map) into
    /// a serializable blob suitable for `SnapshotStore::store_index` or direct
    /// on-disk persistence.
    pub fn export_index(&self) -> SearchIndexBlob {
        let documents: Vec<(DocId, IndexedDocument)> = self
            .documents
            .all()
            .into_iter()
            .map(|doc| (doc.id.clone(), doc))
            .collect();

        SearchIndexBlob {
            version: SNAPSHOT_VERSION,
            config_name: self.config.read().name.clone(),
            documents,
            token_index: self.index.read().clone(),
            posting_map: self.postings.read().clone(),
        }
    }

    /// Replaces the engine's live state with `blob`'s contents wholesale.
    /// Rejects a version mismatch rather than attempting a partial restore.
    /// Clears links and the result cache, since neither is part of the blob.
    pub fn import_index(&self, blob: SearchIndexBlob) -> Result<()> {
        validate_blob_version(&blob, SNAPSHOT_VERSION)?;

        let documents: HashMap<DocId, IndexedDocument> = blob.documents.into_iter().collect();
        self.documents.replace_all(documents);
        *self.index.write() = blob.token_index;
        *self.postings.write() = blob.posting_map;
        self.links.write().clear();
        self.cache.write().clear();
        Ok(())
    }

    pub fn clear(&self) {
        self.documents.clear();
        *self.index.write() = TokenIndex::new();
        self.postings.write().clear();
        self.links.write().clear();
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    pub fn set_cache_strategy(&self, strategy: EvictionStrategy) {
        self.cache.write().set_strategy(strategy);
    }

    /// Re-keys duplicate documents (identical serialized field content) onto
    /// a single canonical copy, keeping the lexicographically-smallest id.
    pub fn optimize_index(&self) -> usize {
        let docs = self.documents.all();
        let mut seen: HashMap<String, DocId> = HashMap::new();
        let mut removed = 0;

        for doc in &docs {
            let fingerprint = serde_json::to_string(&doc.fields).unwrap_or_default();
            match seen.get(&fingerprint) {
                Some(canonical) if canonical != &doc.id => {
                    let _ = self.remove_document(&doc.id);
                    removed += 1;
                }
                _ => {
                    seen.insert(fingerprint, doc.id.clone());
                }
            }
        }
        removed
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Breadth-first traversal of the document link graph starting at
    /// `start`, returning the first document (in visitation order) for which
    /// `predicate` holds. "Any match" is explicitly the contract here, not
    /// the closest or first-inserted one.
    pub fn bfs_search(&self, start: &DocId, predicate: impl Fn(&IndexedDocument) -> bool) -> Option<DocId> {
        let adjacency = self.adjacency();
        let mut queue = std::collections::VecDeque::new();
        let mut visited = std::collections::HashSet::new();
        queue.push_back(start.clone());
        visited.insert(start.clone());

        while let Some(current) = queue.pop_front() {
            if let Some(doc) = self.documents.get(&current) {
                if predicate(&doc) {
                    return Some(current);
                }
            }
            for neighbor in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(neighbor.clone()) {
                    queue.push_back(neighbor.clone());
                }
            }
        }
        None
    }

    /// Depth-first counterpart to `bfs_search`, same "any match" contract.
    pub fn dfs_search(&self, start: &DocId, predicate: impl Fn(&IndexedDocument) -> bool) -> Option<DocId> {
        let adjacency = self.adjacency();
        let mut stack = vec![start.clone()];
        let mut visited = std::collections::HashSet::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(doc) = self.documents.get(&current) {
                if predicate(&doc) {
                    return Some(current);
                }
            }
            for neighbor in adjacency.get(&current).into_iter().flatten() {
                if !visited.contains(neighbor) {
                    stack.push(neighbor.clone());
                }
            }
        }
        None
    }

    fn adjacency(&self) -> HashMap<DocId, Vec<DocId>> {
        let mut adjacency: HashMap<DocId, Vec<DocId>> = HashMap::new();
        for link in self.links.read().iter() {
            adjacency.entry(link.source.clone()).or_default().push(link.target.clone());
            if link.link_type.is_bidirectional() {
                adjacency.entry(link.target.clone()).or_default().push(link.source.clone());
            }
        }
        adjacency
    }

    /// Matches `pattern` as a regular expression against each document's
    /// joined text, compiling it once per call (the result cache's key
    /// already covers `enable_regex`, so repeat queries skip recompilation).
    pub fn search_regex(&self, pattern: &str) -> Result<Vec<SearchResult>> {
        let compiled = regex::Regex::new(pattern)
            .map_err(|e| SearchEngineError::search(format!("invalid regex: {e}")))?;

        let mut results: Vec<SearchResult> = self
            .documents
            .all()
            .into_iter()
            .filter_map(|doc| {
                let text = doc.joined_text();
                compiled.find(&text).map(|m| SearchResult {
                    id: doc.id.clone(),
                    score: 1.0,
                    matches: vec![m.as_str().to_string()],
                    metadata: Some(doc.metadata.extra.clone()),
                })
            })
            .collect();

        results.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(results)
    }
}

fn generate_doc_id(index_name: &str) -> DocId {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    DocId::new(format!("{index_name}-{millis}-{}", &suffix[..8]))
}
