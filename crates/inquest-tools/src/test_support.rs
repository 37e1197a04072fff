// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for tool unit tests.

use std::sync::Arc;

use inquest_corpus::{Corpus, HybridRetriever};

use crate::tool::ToolContext;

/// Five papers with a citation cycle (g1 -> g2 -> g3 -> g1) and one dangling reference.
pub(crate) const PAPERS: &str = r#"[
    {"paper_id": "g1", "title": "Citation hallucination audit", "year": 2024, "stance": "critical",
     "abstract": "Models fabricate citation lists.", "citations": ["g2"]},
    {"paper_id": "g2", "title": "Grounded citation generation", "year": 2022, "stance": "supportive",
     "abstract": "Retrieval grounding reduces citation hallucination.", "citations": ["g3", "missing-9"]},
    {"paper_id": "g3", "title": "Early citation recommendation", "year": 2019, "stance": "supportive",
     "abstract": "Recommending citation candidates from text.", "citations": ["g1"]},
    {"paper_id": "g4", "title": "Review automation survey", "year": 2021,
     "abstract": "Survey of literature review automation.", "citations": ["g2"]},
    {"paper_id": "g5", "title": "Protein structure", "year": 2023,
     "abstract": "Folding with transformers."}
]"#;

pub(crate) fn corpus() -> Arc<Corpus> {
    Arc::new(Corpus::from_json_str(PAPERS).unwrap())
}

pub(crate) fn ctx() -> ToolContext {
    ToolContext {
        retriever: HybridRetriever::new(corpus(), 0.55, 4),
        sub_question: "citation hallucination".into(),
        default_k: 5,
        last_primary_paper: None,
    }
}
