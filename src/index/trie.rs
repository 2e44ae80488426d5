use crate::core::types::DocId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single node of the character-keyed trie. Terminal nodes (`is_end_of_word`)
/// carry the set of documents that contributed the token ending at this node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrieNode {
    pub children: HashMap<char, TrieNode>,
    pub is_end_of_word: bool,
    pub document_refs: HashSet<DocId>,
    pub weight: f64,
    pub frequency: u64,
    pub last_accessed: DateTime<Utc>,
}

impl TrieNode {
    fn new() -> Self {
        TrieNode {
            children: HashMap::new(),
            is_end_of_word: false,
            document_refs: HashSet::new(),
            weight: 1.0,
            frequency: 0,
            last_accessed: Utc::now(),
        }
    }

    /// Relevance score for this node: recency-weighted frequency, discounted
    /// by depth so shorter, more specific tokens outrank long incidental ones.
    fn score(&self, depth: usize, now: DateTime<Utc>) -> f64 {
        let age_hours = (now - self.last_accessed).num_seconds() as f64 / 3600.0;
        let recency = (-age_hours / 24.0).exp();
        (self.weight * self.frequency as f64 * recency) / (depth as f64 + 1.0)
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::new()
    }
}

/// A character-trie inverted index: tokens are inserted character by
/// character, and each terminal node holds the set of documents containing
/// that token. Supports exact, prefix, and bounded-edit-distance lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenIndex {
    root: TrieNode,
}

impl TokenIndex {
    pub fn new() -> Self {
        TokenIndex { root: TrieNode::new() }
    }

    pub fn insert(&mut self, token: &str, doc_id: &DocId, weight: f64) {
        let now = Utc::now();
        let mut node = &mut self.root;
        for ch in token.chars() {
            node = node.children.entry(ch).or_insert_with(TrieNode::new);
        }
        node.is_end_of_word = true;
        node.document_refs.insert(doc_id.clone());
        node.frequency += 1;
        node.weight = weight;
        node.last_accessed = now;
    }

    /// Exact lookup. Touches `last_accessed` on the terminal node so recency
    /// scoring reflects query traffic, not just insert time.
    pub fn search(&mut self, token: &str) -> HashSet<DocId> {
        let node = Self::walk_mut(&mut self.root, token);
        match node {
            Some(n) if n.is_end_of_word => {
                n.last_accessed = Utc::now();
                n.document_refs.clone()
            }
            _ => HashSet::new(),
        }
    }

    fn walk_mut<'a>(mut node: &'a mut TrieNode, token: &str) -> Option<&'a mut TrieNode> {
        for ch in token.chars() {
            node = node.children.get_mut(&ch)?;
        }
        Some(node)
    }

    fn walk<'a>(mut node: &'a TrieNode, token: &str) -> Option<&'a TrieNode> {
        for ch in token.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    /// All documents whose token stream contains a word starting with `prefix`.
    pub fn prefix_search(&self, prefix: &str) -> HashSet<DocId> {
        let Some(node) = Self::walk(&self.root, prefix) else {
            return HashSet::new();
        };
        let mut out = HashSet::new();
        Self::collect_subtree(node, &mut out);
        out
    }

    fn collect_subtree(node: &TrieNode, out: &mut HashSet<DocId>) {
        if node.is_end_of_word {
            out.extend(node.document_refs.iter().cloned());
        }
        for child in node.children.values() {
            Self::collect_subtree(child, out);
        }
    }

    /// Bounded Levenshtein fuzzy search, implemented as a DFS over the trie
    /// while maintaining one edit-distance row per visited column (the
    /// classic trie+DP-row algorithm). `max_distance == 0` degenerates to an
    /// exact search.
    pub fn fuzzy_search(&self, token: &str, max_distance: u8) -> HashSet<DocId> {
        let mut out = HashSet::new();
        if token.is_empty() {
            return out;
        }
        let chars: Vec<char> = token.chars().collect();
        let row: Vec<u32> = (0..=chars.len() as u32).collect();

        for (ch, child) in &self.root.children {
            Self::fuzzy_dfs(child, *ch, &chars, &row, max_distance as u32, &mut out);
        }
        out
    }

    fn fuzzy_dfs(
        node: &TrieNode,
        ch: char,
        target: &[char],
        prev_row: &[u32],
        max_distance: u32,
        out: &mut HashSet<DocId>,
    ) {
        let mut row = vec![prev_row[0] + 1];
        for (i, &t) in target.iter().enumerate() {
            let cost = if t == ch { 0 } else { 1 };
            let insert_cost = row[i] + 1;
            let delete_cost = prev_row[i + 1] + 1;
            let replace_cost = prev_row[i] + cost;
            row.push(insert_cost.min(delete_cost).min(replace_cost));
        }

        if node.is_end_of_word && row[target.len()] <= max_distance {
            out.extend(node.document_refs.iter().cloned());
        }

        if *row.iter().min().unwrap_or(&u32::MAX) <= max_distance {
            for (&next_ch, child) in &node.children {
                Self::fuzzy_dfs(child, next_ch, target, &row, max_distance, out);
            }
        }
    }

    /// Removes `doc_id` from every posting set that contains it, pruning
    /// dead branches bottom-up.
    pub fn remove(&mut self, doc_id: &DocId) {
        Self::remove_recursive(&mut self.root, doc_id);
    }

    fn remove_recursive(node: &mut TrieNode, doc_id: &DocId) -> bool {
        node.document_refs.remove(doc_id);
        if node.is_end_of_word && node.document_refs.is_empty() {
            node.is_end_of_word = false;
        }

        let dead: Vec<char> = node
            .children
            .iter_mut()
            .filter_map(|(&ch, child)| {
                if Self::remove_recursive(child, doc_id) {
                    Some(ch)
                } else {
                    None
                }
            })
            .collect();
        for ch in dead {
            node.children.remove(&ch);
        }

        !node.is_end_of_word && node.children.is_empty()
    }

    /// Relevance-ranked terminal tokens under `prefix`, most useful for
    /// autocomplete-style callers.
    pub fn rank_subtree(&self, prefix: &str, now: DateTime<Utc>) -> Vec<(String, f64)> {
        let Some(node) = Self::walk(&self.root, prefix) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        Self::collect_ranked(node, prefix.to_string(), prefix.chars().count(), now, &mut out);
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out
    }

    fn collect_ranked(
        node: &TrieNode,
        path: String,
        depth: usize,
        now: DateTime<Utc>,
        out: &mut Vec<(String, f64)>,
    ) {
        if node.is_end_of_word {
            out.push((path.clone(), node.score(depth, now)));
        }
        for (&ch, child) in &node.children {
            let mut next = path.clone();
            next.push(ch);
            Self::collect_ranked(child, next, depth + 1, now, out);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

impl Default for TokenIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> DocId {
        DocId::new(id)
    }

    #[test]
    fn exact_search_finds_inserted_token() {
        let mut index = TokenIndex::new();
        index.insert("javascript", &doc("d1"), 1.0);
        assert_eq!(index.search("javascript"), HashSet::from([doc("d1")]));
        assert!(index.search("java").is_empty());
    }

    #[test]
    fn prefix_search_matches_all_descendants() {
        let mut index = TokenIndex::new();
        index.insert("java", &doc("d1"), 1.0);
        index.insert("javascript", &doc("d2"), 1.0);
        index.insert("python", &doc("d3"), 1.0);
        assert_eq!(
            index.prefix_search("java"),
            HashSet::from([doc("d1"), doc("d2")])
        );
    }

    #[test]
    fn fuzzy_search_tolerates_bounded_edits() {
        let mut index = TokenIndex::new();
        index.insert("javascript", &doc("d1"), 1.0);
        let hits = index.fuzzy_search("javascrpt", 2);
        assert!(hits.contains(&doc("d1")));
    }

    #[test]
    fn fuzzy_search_empty_query_is_empty() {
        let index = TokenIndex::new();
        assert!(index.fuzzy_search("", 2).is_empty());
    }

    #[test]
    fn fuzzy_search_zero_distance_behaves_as_exact() {
        let mut index = TokenIndex::new();
        index.insert("rust", &doc("d1"), 1.0);
        assert!(index.fuzzy_search("rest", 0).is_empty());
        assert!(index.fuzzy_search("rust", 0).contains(&doc("d1")));
    }

    #[test]
    fn remove_prunes_dead_branches() {
        let mut index = TokenIndex::new();
        index.insert("rust", &doc("d1"), 1.0);
        index.remove(&doc("d1"));
        assert!(index.search("rust").is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn remove_keeps_shared_prefix_for_other_docs() {
        let mut index = TokenIndex::new();
        index.insert("rust", &doc("d1"), 1.0);
        index.insert("rust", &doc("d2"), 1.0);
        index.remove(&doc("d1"));
        assert_eq!(index.search("rust"), HashSet::from([doc("d2")]));
    }
}
