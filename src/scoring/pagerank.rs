use crate::core::types::{DocId, DocumentLink};
use std::collections::{HashMap, HashSet};

const DAMPING: f64 = 0.85;
const CONVERGENCE_EPSILON: f64 = 1e-4;
const MAX_ITERATIONS: usize = 100;

/// Adjacency list built from a set of `DocumentLink`s. Bidirectional link
/// types contribute an edge in both directions; everything else is directed
/// source -> target.
fn build_adjacency(doc_ids: &[DocId], links: &[DocumentLink]) -> HashMap<DocId, HashSet<DocId>> {
    let mut adjacency: HashMap<DocId, HashSet<DocId>> =
        doc_ids.iter().map(|id| (id.clone(), HashSet::new())).collect();

    for link in links {
        adjacency
            .entry(link.source.clone())
            .or_default()
            .insert(link.target.clone());
        if link.link_type.is_bidirectional() {
            adjacency
                .entry(link.target.clone())
                .or_default()
                .insert(link.source.clone());
        }
    }

    adjacency
}

/// Damped power-iteration PageRank over the document link graph. Sink nodes
/// (no outgoing edges) do not redistribute their rank to the rest of the
/// graph, matching the classic random-surfer model without a teleport fixup.
pub fn rank_documents(doc_ids: &[DocId], links: &[DocumentLink]) -> HashMap<DocId, f64> {
    let n = doc_ids.len();
    if n == 0 {
        return HashMap::new();
    }

    let adjacency = build_adjacency(doc_ids, links);
    let base = (1.0 - DAMPING) / n as f64;
    let mut rank: HashMap<DocId, f64> = doc_ids.iter().map(|id| (id.clone(), 1.0 / n as f64)).collect();

    for _ in 0..MAX_ITERATIONS {
        let mut next: HashMap<DocId, f64> = doc_ids.iter().map(|id| (id.clone(), base)).collect();

        for source in doc_ids {
            let out_links = &adjacency[source];
            if out_links.is_empty() {
                continue;
            }
            let share = DAMPING * rank[source] / out_links.len() as f64;
            for target in out_links {
                if let Some(v) = next.get_mut(target) {
                    *v += share;
                }
            }
        }

        let max_delta = doc_ids
            .iter()
            .map(|id| (next[id] - rank[id]).abs())
            .fold(0.0_f64, f64::max);

        rank = next;
        if max_delta < CONVERGENCE_EPSILON {
            break;
        }
    }

    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RelationType;

    fn link(source: &str, target: &str, link_type: RelationType) -> DocumentLink {
        DocumentLink {
            source: DocId::new(source),
            target: DocId::new(target),
            link_type,
            weight: 1.0,
            url: None,
        }
    }

    #[test]
    fn isolated_documents_share_rank_equally() {
        let ids = vec![DocId::new("a"), DocId::new("b")];
        let rank = rank_documents(&ids, &[]);
        assert!((rank[&DocId::new("a")] - rank[&DocId::new("b")]).abs() < 1e-9);
    }

    #[test]
    fn linked_document_outranks_unlinked_peer() {
        let ids = vec![DocId::new("a"), DocId::new("b"), DocId::new("c")];
        let links = vec![
            link("a", "b", RelationType::Parent),
            link("c", "b", RelationType::Parent),
        ];
        let rank = rank_documents(&ids, &links);
        assert!(rank[&DocId::new("b")] > rank[&DocId::new("a")]);
    }

    #[test]
    fn bidirectional_link_type_adds_edge_both_ways() {
        let ids = vec![DocId::new("a"), DocId::new("b")];
        let links = vec![link("a", "b", RelationType::Related)];
        let adjacency = build_adjacency(&ids, &links);
        assert!(adjacency[&DocId::new("a")].contains(&DocId::new("b")));
        assert!(adjacency[&DocId::new("b")].contains(&DocId::new("a")));
    }

    #[test]
    fn empty_graph_yields_empty_rank() {
        assert!(rank_documents(&[], &[]).is_empty());
    }
}
