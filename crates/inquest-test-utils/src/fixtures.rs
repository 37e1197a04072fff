// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures.

use std::sync::Arc;

use inquest_config::InquestConfig;
use inquest_config::model::ReasonerProvider;
use inquest_core::{Plan, Step};
use inquest_corpus::Corpus;

/// Eight papers on AI-assisted literature review. Contains one citation
/// cycle (`lr-2023-hallucination` <-> `lr-2024-audit`) and one dangling
/// reference (`lr-external-001`).
pub const PAPERS_JSON: &str = include_str!("../fixtures/papers.json");

pub fn corpus() -> Arc<Corpus> {
    Arc::new(Corpus::from_json_str(PAPERS_JSON).expect("fixture dataset parses"))
}

/// Config for tests: heuristic reasoner, small memory window.
pub fn test_config() -> InquestConfig {
    let mut config = InquestConfig::default();
    config.reasoner.provider = ReasonerProvider::Heuristic;
    config.memory.max_entries = 4;
    config.memory.keep_recent = 2;
    config.orchestrator.max_concurrent_runs = 2;
    config
}

pub fn search_step(id: &str, query: &str) -> Step {
    Step::new(query, "hybrid_search", serde_json::json!({"query": query, "k": 4})).with_id(id)
}

pub fn timeline_step(id: &str, topic: &str) -> Step {
    Step::new(topic, "timeline", serde_json::json!({"topic": topic, "k": 5})).with_id(id)
}

pub fn graph_step(id: &str, paper_id: &str) -> Step {
    Step::new(
        format!("citation lineage of {paper_id}"),
        "citation_graph",
        serde_json::json!({"paper_id": paper_id, "depth": 2}),
    )
    .with_id(id)
}

pub fn plan(steps: Vec<Step>) -> Plan {
    Plan::new(steps)
}
