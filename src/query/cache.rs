use crate::core::types::SearchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionStrategy {
    Lru,
    Mru,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<SearchResult>,
    inserted: DateTime<Utc>,
    access_count: u64,
}

/// Caller-visible fingerprint for a cached query: the normalized query text
/// plus the subset of options that change the result set. Options that only
/// affect presentation (`include_matches`) are excluded so two requests that
/// differ only in presentation share a cache entry.
///
/// `threshold` is stored as scaled integer bits (`* 1e6`, rounded) rather
/// than `f64` directly, since `f64` implements neither `Hash` nor `Eq`.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub normalized_query: String,
    pub fuzzy: bool,
    pub max_distance: u8,
    pub max_results: usize,
    pub threshold_bits: i64,
    pub case_sensitive: bool,
    pub enable_regex: bool,
}

impl CacheKey {
    fn canonical_string(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.normalized_query,
            self.fuzzy,
            self.max_distance,
            self.max_results,
            self.threshold_bits,
            self.case_sensitive,
            self.enable_regex
        )
    }
}

/// Fixed-capacity result cache with switchable LRU/MRU eviction and a TTL.
/// Hand-rolled rather than wrapping a third-party LRU map because runtime
/// strategy switching needs direct control over which end of the access
/// order gets evicted.
pub struct ResultCache {
    entries: HashMap<CacheKey, CacheEntry>,
    access_order: VecDeque<CacheKey>,
    max_size: usize,
    ttl: chrono::Duration,
    strategy: EvictionStrategy,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ResultCache {
    pub fn new(max_size: usize, ttl_minutes: i64, strategy: EvictionStrategy) -> Self {
        ResultCache {
            entries: HashMap::new(),
            access_order: VecDeque::new(),
            max_size,
            ttl: chrono::Duration::minutes(ttl_minutes),
            strategy,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn set_strategy(&mut self, strategy: EvictionStrategy) {
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> EvictionStrategy {
        self.strategy
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        self.prune_expired();

        if let Some(entry) = self.entries.get_mut(key) {
            entry.access_count += 1;
            self.hits += 1;
            self.touch(key);
            Some(entry.results.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    pub fn put(&mut self, key: CacheKey, results: Vec<SearchResult>) {
        self.prune_expired();

        if self.entries.len() >= self.max_size && !self.entries.contains_key(&key) {
            self.evict_one();
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                results,
                inserted: Utc::now(),
                access_count: 0,
            },
        );
        self.touch(&key);
    }

    fn touch(&mut self, key: &CacheKey) {
        self.access_order.retain(|k| k != key);
        self.access_order.push_back(key.clone());
    }

    fn evict_one(&mut self) {
        let victim = match self.strategy {
            EvictionStrategy::Lru => self.access_order.pop_front(),
            EvictionStrategy::Mru => self.access_order.pop_back(),
        };
        if let Some(key) = victim {
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }

    fn prune_expired(&mut self) {
        let now = Utc::now();
        let ttl = self.ttl;
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, e)| now - e.inserted > ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            self.entries.remove(&key);
            self.access_order.retain(|k| k != &key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn analyze(&self) -> CacheAnalysis {
        let total = self.hits + self.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
        let average_access_count = if self.entries.is_empty() {
            0.0
        } else {
            self.entries.values().map(|e| e.access_count).sum::<u64>() as f64
                / self.entries.len() as f64
        };

        let mut most_accessed: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|(k, e)| (k.normalized_query.clone(), e.access_count))
            .collect();
        most_accessed.sort_by(|a, b| b.1.cmp(&a.1));
        most_accessed.truncate(5);

        CacheAnalysis {
            hit_rate,
            average_access_count,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.entries.len(),
            max_size: self.max_size,
            strategy: self.strategy,
            most_accessed_keys: most_accessed,
            estimated_memory: self.estimate_memory(),
        }
    }

    /// Two bytes per character of the key's canonical string, plus the
    /// JSON-serialized byte length of the cached entry's results.
    fn estimate_memory(&self) -> String {
        let bytes: usize = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let key_bytes = key.canonical_string().chars().count() * 2;
                let entry_bytes = serde_json::to_string(&entry.results)
                    .map(|s| s.len())
                    .unwrap_or(0);
                key_bytes + entry_bytes
            })
            .sum();
        format_bytes(bytes)
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

#[derive(Debug, Clone)]
pub struct CacheAnalysis {
    pub hit_rate: f64,
    pub average_access_count: f64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub max_size: usize,
    pub strategy: EvictionStrategy,
    pub most_accessed_keys: Vec<(String, u64)>,
    pub estimated_memory: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(q: &str) -> CacheKey {
        CacheKey {
            normalized_query: q.to_string(),
            fuzzy: false,
            max_distance: 2,
            max_results: 50,
            threshold_bits: 0,
            case_sensitive: false,
            enable_regex: false,
        }
    }

    #[test]
    fn distinct_thresholds_are_distinct_keys() {
        let mut cache = ResultCache::new(10, 15, EvictionStrategy::Lru);
        let mut high = key("rust");
        high.threshold_bits = 900_000;
        let mut low = key("rust");
        low.threshold_bits = 0;

        cache.put(high.clone(), vec![]);
        assert!(cache.get(&low).is_none());
        assert!(cache.get(&high).is_some());
    }

    #[test]
    fn analysis_reports_strategy_and_capacity() {
        let cache = ResultCache::new(7, 15, EvictionStrategy::Mru);
        let analysis = cache.analyze();
        assert_eq!(analysis.max_size, 7);
        assert_eq!(analysis.strategy, EvictionStrategy::Mru);
        assert_eq!(analysis.size, 0);
    }

    #[test]
    fn miss_then_hit() {
        let mut cache = ResultCache::new(10, 15, EvictionStrategy::Lru);
        assert!(cache.get(&key("rust")).is_none());
        cache.put(key("rust"), vec![]);
        assert!(cache.get(&key("rust")).is_some());
        assert_eq!(cache.analyze().hits, 1);
        assert_eq!(cache.analyze().misses, 1);
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut cache = ResultCache::new(2, 15, EvictionStrategy::Lru);
        cache.put(key("a"), vec![]);
        cache.put(key("b"), vec![]);
        cache.get(&key("a"));
        cache.put(key("c"), vec![]);
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("a")).is_some());
    }

    #[test]
    fn mru_evicts_most_recently_used() {
        let mut cache = ResultCache::new(2, 15, EvictionStrategy::Mru);
        cache.put(key("a"), vec![]);
        cache.put(key("b"), vec![]);
        cache.get(&key("b"));
        cache.put(key("c"), vec![]);
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("a")).is_some());
    }

    #[test]
    fn ttl_expires_entries() {
        let mut cache = ResultCache::new(10, -1, EvictionStrategy::Lru);
        cache.put(key("a"), vec![]);
        assert!(cache.get(&key("a")).is_none());
    }
}
