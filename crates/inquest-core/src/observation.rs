// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observations produced by tool calls and their compact projections.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::plan::Ambiguity;
use crate::types::Section;

/// One ranked (paper, section) chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub chunk_id: String,
    pub paper_id: String,
    pub title: String,
    pub year: i32,
    pub section: Section,
    pub language: String,
    pub stance: String,
    pub hybrid_score: f64,
    pub keyword_score: f64,
    pub semantic_score: f64,
    /// Raw chunk text. Stripped from compact traces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Hit {
    /// Returns a copy of this hit without its text.
    pub fn without_text(&self) -> Hit {
        Hit {
            text: None,
            ..self.clone()
        }
    }
}

/// One row of a chronological timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub paper_id: String,
    pub year: i32,
    pub title: String,
}

/// A node reached by citation-graph traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub paper_id: String,
    /// Distance in hops from the traversal root.
    pub hops: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// True when the id is cited but absent from the dataset.
    #[serde(default)]
    pub dangling: bool,
}

/// A directed "cites" edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// The result of a bounded breadth-first citation traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationGraph {
    pub root: String,
    pub depth: usize,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// The full result of one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub tool: String,
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<CitationGraph>,
    /// Paper ids cited by this observation's evidence, with repetition.
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub ambiguity: Ambiguity,
    /// Set when the query had no indexable terms.
    #[serde(default)]
    pub empty_query: bool,
}

impl Observation {
    /// Creates an observation for `tool` with no evidence.
    pub fn empty(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            hits: Vec::new(),
            timeline: Vec::new(),
            graph: None,
            citations: Vec::new(),
            ambiguity: Ambiguity::forced(),
            empty_query: false,
        }
    }

    /// Number of evidence items this observation carries.
    pub fn hit_count(&self) -> usize {
        let primary = if self.hits.is_empty() {
            self.timeline.len()
        } else {
            self.hits.len()
        };
        primary + self.graph.as_ref().map_or(0, |g| g.nodes.len())
    }

    /// Distinct cited paper ids in first-seen order.
    pub fn distinct_papers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.citations
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    /// Paper of the highest-scoring hit, first in order among equal scores.
    pub fn primary_paper(&self) -> Option<&str> {
        self.hits
            .iter()
            .reduce(|best, hit| {
                if hit.hybrid_score > best.hybrid_score {
                    hit
                } else {
                    best
                }
            })
            .map(|hit| hit.paper_id.as_str())
    }

    /// Returns a copy with hit text removed.
    pub fn without_text(&self) -> Observation {
        Observation {
            hits: self.hits.iter().map(Hit::without_text).collect(),
            ..self.clone()
        }
    }

    /// Projects the observation into its compact form, keeping at most `top_hits` hits.
    pub fn summarize(&self, top_hits: usize) -> ObservationSummary {
        let paper_ids = self.distinct_papers();
        ObservationSummary {
            tool: self.tool.clone(),
            hit_count: self.hit_count(),
            top_hits: self
                .hits
                .iter()
                .take(top_hits)
                .map(HitSummary::from)
                .collect(),
            distinct_papers: paper_ids.len(),
            paper_ids,
            ambiguity: self.ambiguity,
            empty_query: self.empty_query,
            error: None,
        }
    }
}

/// A hit reduced to identifiers and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitSummary {
    pub paper_id: String,
    pub title: String,
    pub year: i32,
    pub section: Section,
    pub hybrid_score: f64,
}

impl From<&Hit> for HitSummary {
    fn from(hit: &Hit) -> Self {
        Self {
            paper_id: hit.paper_id.clone(),
            title: hit.title.clone(),
            year: hit.year,
            section: hit.section,
            hybrid_score: hit.hybrid_score,
        }
    }
}

/// The compact projection of an observation kept in memory and in the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSummary {
    pub tool: String,
    pub hit_count: usize,
    pub top_hits: Vec<HitSummary>,
    pub distinct_papers: usize,
    pub paper_ids: Vec<String>,
    pub ambiguity: Ambiguity,
    #[serde(default)]
    pub empty_query: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ObservationSummary {
    /// Summary for a step whose tool call failed. Carries forced ambiguity.
    pub fn failed(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            hit_count: 0,
            top_hits: Vec::new(),
            distinct_papers: 0,
            paper_ids: Vec::new(),
            ambiguity: Ambiguity::forced(),
            empty_query: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(paper: &str, score: f64) -> Hit {
        Hit {
            chunk_id: format!("{paper}:abstract"),
            paper_id: paper.into(),
            title: format!("Title {paper}"),
            year: 2024,
            section: Section::Abstract,
            language: "en".into(),
            stance: "supportive".into(),
            hybrid_score: score,
            keyword_score: score,
            semantic_score: score,
            text: Some("body".into()),
        }
    }

    #[test]
    fn summary_caps_top_hits_and_counts_distinct_papers() {
        let mut obs = Observation::empty("hybrid_search");
        obs.hits = vec![hit("p1", 0.9), hit("p2", 0.8), hit("p1", 0.7), hit("p3", 0.1)];
        obs.citations = obs.hits.iter().map(|h| h.paper_id.clone()).collect();

        let summary = obs.summarize(2);
        assert_eq!(summary.hit_count, 4);
        assert_eq!(summary.top_hits.len(), 2);
        assert_eq!(summary.distinct_papers, 3);
        assert_eq!(summary.paper_ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn primary_paper_is_best_scored_hit() {
        let mut obs = Observation::empty("timeline");
        assert_eq!(obs.primary_paper(), None);
        obs.hits = vec![hit("old", 0.2), hit("best", 0.9), hit("tie", 0.9)];
        assert_eq!(obs.primary_paper(), Some("best"));
    }

    #[test]
    fn without_text_strips_every_hit() {
        let mut obs = Observation::empty("hybrid_search");
        obs.hits = vec![hit("p1", 0.5)];
        let stripped = obs.without_text();
        assert!(stripped.hits.iter().all(|h| h.text.is_none()));
        let json = serde_json::to_value(&stripped).unwrap();
        assert!(json["hits"][0].get("text").is_none());
    }

    #[test]
    fn failed_summary_forces_ambiguity() {
        let s = ObservationSummary::failed("web_search", "unknown tool `web_search`");
        assert!(s.ambiguity.low_coverage);
        assert_eq!(s.hit_count, 0);
        assert!(s.error.is_some());
    }

    #[test]
    fn graph_nodes_count_as_evidence() {
        let mut obs = Observation::empty("citation_graph");
        obs.graph = Some(CitationGraph {
            root: "p1".into(),
            depth: 1,
            nodes: vec![
                GraphNode {
                    paper_id: "p1".into(),
                    hops: 0,
                    title: None,
                    year: None,
                    dangling: false,
                },
                GraphNode {
                    paper_id: "p2".into(),
                    hops: 1,
                    title: None,
                    year: None,
                    dangling: true,
                },
            ],
            edges: vec![GraphEdge {
                from: "p1".into(),
                to: "p2".into(),
            }],
        });
        assert_eq!(obs.hit_count(), 2);
    }
}
