// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic offline reasoner.
//!
//! Plans a fixed four-step survey, replans whenever an observation reports
//! low coverage or conflicting stances, and summarizes by listing the top
//! pooled evidence. Selected only by `reasoner.provider = "heuristic"`.

use std::collections::HashSet;

use async_trait::async_trait;
use inquest_core::{
    InquestError, Plan, PlanRequest, Reasoner, ReflectRequest, Reflection, Step,
    SummarizeRequest, Synthesis,
};
use serde_json::json;

/// Evidence items listed in a heuristic synthesis.
const SUMMARY_POINTS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicReasoner;

impl HeuristicReasoner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Reasoner for HeuristicReasoner {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn plan(&self, request: &PlanRequest) -> Result<Plan, InquestError> {
        let query = request.query.as_str();
        let plan = Plan {
            objective: Some(query.to_string()),
            steps: vec![
                Step::new(
                    format!("Break down scope and time range for: {query}"),
                    "timeline",
                    json!({"topic": query, "k": 5}),
                )
                .with_id("s1"),
                Step::new(query, "hybrid_search", json!({"query": query, "k": 6})).with_id("s2"),
                Step::new(
                    format!("{query} contradictory multilingual evidence"),
                    "hybrid_search",
                    json!({"query": format!("{query} contradictory multilingual"), "k": 6}),
                )
                .with_id("s3"),
                Step::new(
                    "Inspect citation lineage of strongest source",
                    "citation_graph",
                    json!({"paper_id": "auto"}),
                )
                .with_id("s4"),
            ],
        };
        plan.validate()?;
        Ok(plan)
    }

    async fn reflect(&self, request: &ReflectRequest) -> Result<Reflection, InquestError> {
        let ambiguity = request.observation.ambiguity;
        if !ambiguity.any() {
            return Ok(Reflection {
                ambiguity,
                ..Reflection::proceed("sufficient evidence for next step")
            });
        }

        let reason = if ambiguity.low_coverage {
            "evidence coverage is narrow"
        } else {
            "conflicting findings"
        };
        let sub_question = &request.step.sub_question;
        let parent = request.step.id.as_deref().unwrap_or("x");
        let follow_up = Step::new(
            format!("Resolve ambiguity for: {sub_question}"),
            "hybrid_search",
            json!({"query": format!("{sub_question} replication study limitations"), "k": 6}),
        )
        .with_id(format!("r-{parent}"));

        Ok(Reflection {
            ambiguity,
            ..Reflection::replan_with(reason, vec![follow_up])
        })
    }

    async fn summarize(&self, request: &SummarizeRequest) -> Result<Synthesis, InquestError> {
        let top = &request.evidence[..request.evidence.len().min(SUMMARY_POINTS)];
        let evidence_points: Vec<String> = top
            .iter()
            .map(|h| format!("- [{}] {} ({}), {}", h.paper_id, h.title, h.year, h.section))
            .collect();

        let mut seen = HashSet::new();
        let citations: Vec<String> = top
            .iter()
            .filter(|h| seen.insert(h.paper_id.as_str()))
            .map(|h| h.paper_id.clone())
            .collect();

        let stances: HashSet<&str> = request.evidence.iter().map(|h| h.stance.as_str()).collect();
        let answer = match top.first() {
            Some(best) => format!(
                "Query: {}\nSynthesis: {} pooled evidence items across {} cited papers; \
                 the strongest match is [{}] {} ({}).",
                request.query,
                request.evidence.len(),
                request.memory.distinct_papers,
                best.paper_id,
                best.title,
                best.year
            ),
            None => format!(
                "Query: {}\nSynthesis: no evidence was retrieved for this query.",
                request.query
            ),
        };

        let mut risks = Vec::new();
        if request.evidence.is_empty() {
            risks.push("No supporting evidence in the dataset".to_string());
        }
        if stances.len() > 1 {
            risks.push("Sources disagree on the central claim".to_string());
        }
        risks.push("Heuristic synthesis: claims are not model-verified".to_string());

        Ok(Synthesis {
            answer,
            evidence_points,
            risks,
            citations,
        })
    }
}
