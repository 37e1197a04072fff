// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction. Each prompt is a system instruction plus one user
//! message holding a JSON document with the inputs, the expected schema, and
//! the rules for the operation.

use inquest_core::{PlanRequest, ReflectRequest, SummarizeRequest};
use serde_json::json;

use crate::types::ChatMessage;

const PLAN_SYSTEM: &str = "You are a planning reasoner for literature research. Return strict JSON only.";
const REFLECT_SYSTEM: &str = "Evaluate evidence sufficiency and ambiguity. Return strict JSON only.";
const SUMMARIZE_SYSTEM: &str = "You are a synthesis reasoner. Return strict JSON only.";

fn step_schema() -> serde_json::Value {
    json!({
        "id": "string",
        "sub_question": "string",
        "tool": "string",
        "tool_args": "object"
    })
}

pub fn plan_messages(request: &PlanRequest) -> Vec<ChatMessage> {
    let body = json!({
        "query": request.query,
        "memory": request.memory,
        "tools": request.capabilities.tools,
        "sections": request.capabilities.sections,
        "schema": {
            "objective": "string",
            "steps": [step_schema()]
        },
        "rules": [
            "use 3-6 steps",
            "only use the listed tools",
            "prefer hybrid_search for evidence",
            "include at least one step that resolves ambiguity"
        ]
    });
    vec![ChatMessage::system(PLAN_SYSTEM), ChatMessage::user(body.to_string())]
}

pub fn reflect_messages(request: &ReflectRequest) -> Vec<ChatMessage> {
    let body = json!({
        "query": request.query,
        "step_index": request.step_index,
        "step": request.step,
        "observation": request.observation,
        "memory": request.memory,
        "schema": {
            "ambiguity": {"low_coverage": "boolean", "conflicting_stances": "boolean"},
            "replan": "boolean",
            "reason": "string",
            "new_steps": [step_schema()]
        },
        "rules": [
            "set replan only when the evidence is narrow or contradictory",
            "new_steps run immediately after the current step"
        ]
    });
    vec![ChatMessage::system(REFLECT_SYSTEM), ChatMessage::user(body.to_string())]
}

pub fn summarize_messages(request: &SummarizeRequest) -> Vec<ChatMessage> {
    let body = json!({
        "query": request.query,
        "memory": request.memory,
        "evidence": request.evidence,
        "schema": {
            "answer": "string",
            "evidence_points": ["string"],
            "risks": ["string"],
            "citations": ["paper_id"]
        },
        "rules": [
            "ground every claim in the evidence",
            "point out ambiguity and contradictions",
            "cite paper ids from the evidence only",
            "be concise"
        ]
    });
    vec![
        ChatMessage::system(SUMMARIZE_SYSTEM),
        ChatMessage::user(body.to_string()),
    ]
}
