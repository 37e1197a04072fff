// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The citation network as a directed petgraph graph.
//!
//! An edge `a -> b` means paper `a` cites paper `b`. Cited ids missing from
//! the dataset become dangling nodes with no outgoing edges. Cycles are kept
//! as they appear in the data.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::dataset::PaperRecord;

/// Node weight: a paper id and whether the dataset holds that paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitedPaper {
    pub paper_id: String,
    pub dangling: bool,
}

#[derive(Debug, Default)]
pub struct CitationNetwork {
    graph: DiGraph<CitedPaper, ()>,
    node_index: HashMap<String, NodeIndex>,
}

impl CitationNetwork {
    /// Builds the network from deduplicated citation lists. Dataset papers
    /// get node indices in dataset order, dangling ids after them.
    pub fn build(papers: &[PaperRecord]) -> Self {
        let mut network = Self::default();
        for paper in papers {
            network.ensure_node(&paper.paper_id, false);
        }
        for paper in papers {
            let from = network.ensure_node(&paper.paper_id, false);
            for cited in &paper.citations {
                let to = network.ensure_node(cited, true);
                network.graph.add_edge(from, to, ());
            }
        }
        network
    }

    fn ensure_node(&mut self, paper_id: &str, dangling: bool) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(paper_id) {
            return idx;
        }
        let idx = self.graph.add_node(CitedPaper {
            paper_id: paper_id.to_string(),
            dangling,
        });
        self.node_index.insert(paper_id.to_string(), idx);
        idx
    }

    pub fn node(&self, paper_id: &str) -> Option<NodeIndex> {
        self.node_index.get(paper_id).copied()
    }

    pub fn paper(&self, idx: NodeIndex) -> &CitedPaper {
        &self.graph[idx]
    }

    /// Neighbours of `idx` in `direction`, in the order their edges were
    /// added (citation-list order outgoing, dataset order incoming).
    pub fn neighbours(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        // petgraph lists the most recently added edge first.
        let mut neighbours: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbours.reverse();
        neighbours
    }

    /// Ids of the papers citing `paper_id`, in dataset order.
    pub fn cited_by(&self, paper_id: &str) -> Vec<&str> {
        self.node(paper_id)
            .map(|idx| {
                self.neighbours(idx, Direction::Incoming)
                    .into_iter()
                    .map(|n| self.graph[n].paper_id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Corpus;

    const CYCLE: &str = r#"[
        {"paper_id": "a", "title": "A", "year": 2020, "citations": ["b", "ghost"]},
        {"paper_id": "b", "title": "B", "year": 2021, "citations": ["c"]},
        {"paper_id": "c", "title": "C", "year": 2022, "citations": ["a"]},
        {"paper_id": "d", "title": "D", "year": 2023, "citations": ["b"]}
    ]"#;

    #[test]
    fn dangling_ids_become_flagged_nodes() {
        let corpus = Corpus::from_json_str(CYCLE).unwrap();
        let network = corpus.citations();
        assert_eq!(network.node_count(), 5);
        assert_eq!(network.edge_count(), 5);
        let ghost = network.node("ghost").unwrap();
        assert!(network.paper(ghost).dangling);
        assert!(network.neighbours(ghost, Direction::Outgoing).is_empty());
        assert!(!network.paper(network.node("a").unwrap()).dangling);
    }

    #[test]
    fn neighbours_follow_insertion_order() {
        let corpus = Corpus::from_json_str(CYCLE).unwrap();
        let network = corpus.citations();
        let a = network.node("a").unwrap();
        let out: Vec<&str> = network
            .neighbours(a, Direction::Outgoing)
            .into_iter()
            .map(|n| network.paper(n).paper_id.as_str())
            .collect();
        assert_eq!(out, vec!["b", "ghost"]);
        assert_eq!(network.cited_by("b"), vec!["a", "d"]);
        assert!(network.cited_by("nobody").is_empty());
    }
}
