// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hybrid_search`: ranked section chunks for a query.

use std::collections::HashSet;

use async_trait::async_trait;
use inquest_core::{Ambiguity, Hit, InquestError, Observation, Section};
use inquest_corpus::CorpusError;
use serde::Deserialize;
use tracing::debug;

use crate::tool::{Tool, ToolContext, parse_args};

pub const NAME: &str = "hybrid_search";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default, alias = "top_k")]
    k: Option<usize>,
}

pub struct HybridSearchTool;

#[async_trait]
impl Tool for HybridSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Hybrid semantic + keyword search over paper sections"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search text; defaults to the step's sub_question" },
                "sections": {
                    "type": "array",
                    "items": { "type": "string", "enum": ["abstract", "methodology", "findings", "limitations"] },
                    "description": "Sections to search; all when omitted"
                },
                "k": { "type": "integer", "minimum": 1, "description": "Maximum hits" }
            }
        })
    }

    async fn invoke(
        &self,
        ctx: &ToolContext,
        args: &serde_json::Value,
    ) -> Result<Observation, InquestError> {
        let args: SearchArgs = parse_args(NAME, args)?;
        let k = args.k.unwrap_or(ctx.default_k);
        if k == 0 {
            return Err(InquestError::tool_failed(NAME, "k must be at least 1"));
        }
        let query = args.query.as_deref().unwrap_or(&ctx.sub_question);

        match ctx.retriever.search(query, &args.sections, k) {
            Ok(hits) => Ok(observe_hits(NAME, hits)),
            Err(CorpusError::EmptyQuery) => {
                debug!(tool = NAME, "empty query");
                let mut observation = Observation::empty(NAME);
                observation.empty_query = true;
                Ok(observation)
            }
            Err(other) => Err(InquestError::tool_failed(NAME, other.to_string())),
        }
    }
}

/// Wraps ranked hits into an observation with coverage and stance indicators.
pub(crate) fn observe_hits(tool: &str, hits: Vec<Hit>) -> Observation {
    let papers: HashSet<&str> = hits.iter().map(|h| h.paper_id.as_str()).collect();
    let stances: HashSet<&str> = hits.iter().map(|h| h.stance.as_str()).collect();
    let ambiguity = Ambiguity {
        low_coverage: papers.len() < 2,
        conflicting_stances: stances.len() > 1,
    };
    let citations = hits.iter().map(|h| h.paper_id.clone()).collect();
    Observation {
        tool: tool.to_string(),
        hits,
        timeline: Vec::new(),
        graph: None,
        citations,
        ambiguity,
        empty_query: false,
    }
}
