use crate::core::types::IndexedDocument;
use chrono::Utc;
use std::collections::HashMap;

/// Per-term, per-document statistics feeding the combined score.
#[derive(Debug, Clone, Copy)]
pub struct TermStats {
    pub term_frequency: f64,
    pub inverse_document_frequency: f64,
    pub matched_exactly: bool,
    pub matched_fuzzy_or_prefix: bool,
}

/// `tf = occurrences / words_in_document`.
pub fn term_frequency(term: &str, doc_words: &[String]) -> f64 {
    if doc_words.is_empty() {
        return 0.0;
    }
    let occurrences = doc_words.iter().filter(|w| w.as_str() == term).count();
    occurrences as f64 / doc_words.len() as f64
}

/// `idf = ln(|D| / (1 + doc_freq))`.
pub fn inverse_document_frequency(total_docs: usize, doc_freq: usize) -> f64 {
    (total_docs as f64 / (1.0 + doc_freq as f64)).ln()
}

/// Text-match component: 1.0 for an exact token hit, 0.5 for fuzzy/prefix,
/// scaled by `(1 + tf)`, averaged across query terms.
pub fn text_match_score(term_stats: &[TermStats]) -> f64 {
    if term_stats.is_empty() {
        return 0.0;
    }
    let sum: f64 = term_stats
        .iter()
        .map(|s| {
            let base = if s.matched_exactly {
                1.0
            } else if s.matched_fuzzy_or_prefix {
                0.5
            } else {
                0.0
            };
            base * (1.0 + s.term_frequency)
        })
        .sum();
    sum / term_stats.len() as f64
}

/// Weighted combination of text match, graph rank, and TF-IDF, per the
/// engine's default relevance formula.
pub fn combined_score(text_match: f64, rank: f64, tf_idf: f64) -> f64 {
    0.3 * text_match + 0.2 * rank + 0.5 * tf_idf
}

/// Applies a freshness discount: documents older than `max_age_days` are
/// capped at the 0.7 floor, newer documents scale linearly up to 1.0.
pub fn apply_freshness(base_score: f64, doc: &IndexedDocument, max_age_days: f64) -> f64 {
    let age_days = (Utc::now() - doc.metadata.last_modified).num_seconds() as f64 / 86_400.0;
    let freshness = (1.0 - (age_days / max_age_days)).max(0.0);
    base_score * (0.7 + 0.3 * freshness)
}

pub const DEFAULT_MAX_AGE_DAYS: f64 = 365.0;

/// Computes `idf` for every token across the full document corpus, given
/// each token's document frequency.
pub fn build_idf_table(
    total_docs: usize,
    document_frequencies: &HashMap<String, usize>,
) -> HashMap<String, f64> {
    document_frequencies
        .iter()
        .map(|(term, &freq)| (term.clone(), inverse_document_frequency(total_docs, freq)))
        .collect()
}

/// Stable result ordering: score descending, then `last_modified`
/// descending, then id ascending.
pub fn ordering_key(doc: &IndexedDocument, score: f64) -> (std::cmp::Reverse<i64>, std::cmp::Reverse<i64>, String) {
    let score_bits = std::cmp::Reverse((score * 1_000_000.0) as i64);
    let modified_bits = std::cmp::Reverse(doc.metadata.last_modified.timestamp());
    (score_bits, modified_bits, doc.id.as_str().to_string())
}
