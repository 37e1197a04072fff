// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `citation_graph`: bounded breadth-first traversal of the citation network.
//!
//! Every paper id is visited at most once, so cycles in the dataset terminate.
//! Ids that are cited but absent from the dataset are reported as dangling
//! nodes and never expanded.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use inquest_core::{Ambiguity, CitationGraph, GraphEdge, GraphNode, InquestError, Observation};
use inquest_corpus::Corpus;
use petgraph::Direction;
use serde::Deserialize;
use tracing::debug;

use crate::tool::{Tool, ToolContext, parse_args};

pub const NAME: &str = "citation_graph";

/// Placeholder id resolved from the run's most recent retrieval.
pub const AUTO_PAPER: &str = "auto";

pub const DEFAULT_DEPTH: usize = 1;
pub const MAX_DEPTH: usize = 5;

/// Papers the root cites.
pub const OUTGOING: &[Direction] = &[Direction::Outgoing];
/// Papers citing the root.
pub const INCOMING: &[Direction] = &[Direction::Incoming];
pub const BOTH: &[Direction] = &[Direction::Outgoing, Direction::Incoming];

#[derive(Debug, Deserialize)]
struct GraphArgs {
    #[serde(default)]
    paper_id: Option<String>,
    #[serde(default)]
    depth: Option<usize>,
    #[serde(default)]
    direction: Option<String>,
}

fn directions(name: Option<&str>) -> Result<&'static [Direction], InquestError> {
    match name {
        None | Some("outgoing") => Ok(OUTGOING),
        Some("incoming") => Ok(INCOMING),
        Some("both") => Ok(BOTH),
        Some(other) => Err(InquestError::tool_failed(
            NAME,
            format!("unknown direction `{other}`, expected outgoing, incoming or both"),
        )),
    }
}

pub struct CitationGraphTool;

#[async_trait]
impl Tool for CitationGraphTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Citation neighbourhood of a paper up to a bounded depth"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "paper_id": {
                    "type": "string",
                    "description": "Root paper id, or \"auto\" for the top paper of the latest search"
                },
                "depth": { "type": "integer", "minimum": 1, "maximum": MAX_DEPTH },
                "direction": { "type": "string", "enum": ["outgoing", "incoming", "both"] }
            }
        })
    }

    async fn invoke(
        &self,
        ctx: &ToolContext,
        args: &serde_json::Value,
    ) -> Result<Observation, InquestError> {
        let args: GraphArgs = parse_args(NAME, args)?;
        let directions = directions(args.direction.as_deref())?;
        let corpus = ctx.retriever.corpus();

        let root = match args.paper_id.as_deref() {
            None | Some(AUTO_PAPER) => resolve_auto(ctx, corpus)?,
            Some(id) => id.to_string(),
        };
        if !corpus.contains(&root) {
            return Err(InquestError::tool_failed(
                NAME,
                format!("paper `{root}` is not in the dataset"),
            ));
        }

        let depth = args.depth.unwrap_or(DEFAULT_DEPTH).clamp(1, MAX_DEPTH);
        let graph = traverse(corpus, &root, depth, directions);
        debug!(
            root = %root,
            depth,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "citation traversal"
        );

        let citations: Vec<String> = graph
            .nodes
            .iter()
            .filter(|n| !n.dangling)
            .map(|n| n.paper_id.clone())
            .collect();
        let stances: HashSet<&str> = citations
            .iter()
            .filter_map(|id| corpus.get(id))
            .map(|p| p.stance.as_str())
            .collect();
        let neighbours = graph.nodes.iter().filter(|n| n.hops > 0).count();
        let ambiguity = Ambiguity {
            low_coverage: neighbours < 2,
            conflicting_stances: stances.len() > 1,
        };

        Ok(Observation {
            tool: NAME.to_string(),
            hits: Vec::new(),
            timeline: Vec::new(),
            graph: Some(graph),
            citations,
            ambiguity,
            empty_query: false,
        })
    }
}

fn resolve_auto(ctx: &ToolContext, corpus: &Corpus) -> Result<String, InquestError> {
    if let Some(id) = &ctx.last_primary_paper
        && corpus.contains(id)
    {
        return Ok(id.clone());
    }
    corpus
        .papers()
        .first()
        .map(|p| p.paper_id.clone())
        .ok_or_else(|| InquestError::tool_failed(NAME, "dataset is empty"))
}

/// Breadth-first traversal from `root` to at most `depth` hops, following
/// each of `directions` in turn.
///
/// Nodes come out in discovery order; neighbours of a node are visited in the
/// order their citations appear in the dataset. Dangling nodes are reported
/// but never expanded.
pub fn traverse(corpus: &Corpus, root: &str, depth: usize, directions: &[Direction]) -> CitationGraph {
    let network = corpus.citations();
    let mut graph = CitationGraph {
        root: root.to_string(),
        depth,
        nodes: vec![node(corpus, root, 0)],
        edges: Vec::new(),
    };
    let Some(start) = network.node(root) else {
        return graph;
    };

    let mut visited = HashSet::from([start]);
    let mut edge_set: HashSet<GraphEdge> = HashSet::new();
    let mut queue = VecDeque::from([(start, 0usize)]);

    while let Some((current, hops)) = queue.pop_front() {
        if hops >= depth || network.paper(current).dangling {
            continue;
        }
        let current_id = &network.paper(current).paper_id;

        for &direction in directions {
            for neighbour in network.neighbours(current, direction) {
                let neighbour_id = &network.paper(neighbour).paper_id;
                let edge = match direction {
                    Direction::Outgoing => GraphEdge {
                        from: current_id.clone(),
                        to: neighbour_id.clone(),
                    },
                    Direction::Incoming => GraphEdge {
                        from: neighbour_id.clone(),
                        to: current_id.clone(),
                    },
                };
                if edge_set.insert(edge.clone()) {
                    graph.edges.push(edge);
                }
                if visited.insert(neighbour) {
                    graph.nodes.push(node(corpus, neighbour_id, hops + 1));
                    queue.push_back((neighbour, hops + 1));
                }
            }
        }
    }

    graph
}

fn node(corpus: &Corpus, id: &str, hops: usize) -> GraphNode {
    match corpus.get(id) {
        Some(paper) => GraphNode {
            paper_id: id.to_string(),
            hops,
            title: Some(paper.title.clone()),
            year: Some(paper.year),
            dangling: false,
        },
        None => GraphNode {
            paper_id: id.to_string(),
            hops,
            title: None,
            year: None,
            dangling: true,
        },
    }
}
