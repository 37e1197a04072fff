// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `timeline`: papers on a topic in chronological order.

use std::collections::HashSet;

use async_trait::async_trait;
use inquest_core::{Ambiguity, Hit, InquestError, Observation, TimelineEntry};
use inquest_corpus::{Corpus, CorpusError};
use serde::Deserialize;
use tracing::debug;

use crate::tool::{Tool, ToolContext, parse_args};

pub const NAME: &str = "timeline";

/// Candidate pool size for topic timelines.
const MIN_CANDIDATES: usize = 10;

#[derive(Debug, Deserialize)]
struct TimelineArgs {
    #[serde(default, alias = "query")]
    topic: Option<String>,
    #[serde(default)]
    paper_ids: Vec<String>,
    #[serde(default, alias = "top_k")]
    k: Option<usize>,
}

pub struct TimelineTool;

#[async_trait]
impl Tool for TimelineTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Chronological list of papers for a topic or explicit paper ids"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string", "description": "Topic text; defaults to the step's sub_question" },
                "paper_ids": { "type": "array", "items": { "type": "string" } },
                "k": { "type": "integer", "minimum": 1 }
            }
        })
    }

    async fn invoke(
        &self,
        ctx: &ToolContext,
        args: &serde_json::Value,
    ) -> Result<Observation, InquestError> {
        let args: TimelineArgs = parse_args(NAME, args)?;
        let k = args.k.unwrap_or(ctx.default_k);
        if k == 0 {
            return Err(InquestError::tool_failed(NAME, "k must be at least 1"));
        }

        if !args.paper_ids.is_empty() {
            return Ok(from_paper_ids(ctx.retriever.corpus(), &args.paper_ids, k));
        }

        let topic = args.topic.as_deref().unwrap_or(&ctx.sub_question);
        let hits = match ctx.retriever.search(topic, &[], k.max(MIN_CANDIDATES)) {
            Ok(hits) => hits,
            Err(CorpusError::EmptyQuery) => {
                let mut observation = Observation::empty(NAME);
                observation.empty_query = true;
                return Ok(observation);
            }
            Err(other) => return Err(InquestError::tool_failed(NAME, other.to_string())),
        };

        // Hits arrive ranked, so the first per paper is its best.
        let mut seen = HashSet::new();
        let mut best: Vec<Hit> = hits
            .into_iter()
            .filter(|hit| seen.insert(hit.paper_id.clone()))
            .collect();
        best.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.paper_id.cmp(&b.paper_id)));
        best.truncate(k);

        let timeline = best
            .iter()
            .map(|hit| TimelineEntry {
                paper_id: hit.paper_id.clone(),
                year: hit.year,
                title: hit.title.clone(),
            })
            .collect();
        let stances = best.iter().map(|hit| hit.stance.as_str());
        let ambiguity = ambiguity_for(best.len(), stances);
        let citations = best.iter().map(|hit| hit.paper_id.clone()).collect();
        debug!(topic, entries = best.len(), "topic timeline");

        Ok(Observation {
            tool: NAME.to_string(),
            hits: best,
            timeline,
            graph: None,
            citations,
            ambiguity,
            empty_query: false,
        })
    }
}

/// Timeline over explicit ids. Ids missing from the dataset are skipped.
fn from_paper_ids(corpus: &Corpus, ids: &[String], k: usize) -> Observation {
    let mut seen = HashSet::new();
    let mut papers: Vec<_> = ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| corpus.get(id))
        .collect();
    let skipped = seen.len() - papers.len();
    if skipped > 0 {
        debug!(skipped, "timeline ignored unknown paper ids");
    }
    papers.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.paper_id.cmp(&b.paper_id)));
    papers.truncate(k);

    let ambiguity = ambiguity_for(papers.len(), papers.iter().map(|p| p.stance.as_str()));
    Observation {
        tool: NAME.to_string(),
        hits: Vec::new(),
        timeline: papers
            .iter()
            .map(|p| TimelineEntry {
                paper_id: p.paper_id.clone(),
                year: p.year,
                title: p.title.clone(),
            })
            .collect(),
        graph: None,
        citations: papers.iter().map(|p| p.paper_id.clone()).collect(),
        ambiguity,
        empty_query: false,
    }
}

fn ambiguity_for<'a>(papers: usize, stances: impl Iterator<Item = &'a str>) -> Ambiguity {
    let distinct: HashSet<&str> = stances.collect();
    Ambiguity {
        low_coverage: papers < 2,
        conflicting_stances: distinct.len() > 1,
    }
}
