// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict decoding of reasoner responses into plans, reflections, and syntheses.

use std::sync::LazyLock;

use inquest_core::{InquestError, Plan, ReasonerOperation, Reflection, Synthesis};
use regex::Regex;
use serde::de::DeserializeOwned;

/// Outermost `{ ... }` span, for content wrapped in prose or code fences.
static EMBEDDED_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("embedded object pattern is valid"));

/// Extracts the JSON object in `content`.
///
/// Accepts a bare object, or text containing exactly one outermost object.
pub fn extract_json(
    operation: ReasonerOperation,
    content: &str,
) -> Result<serde_json::Value, InquestError> {
    let trimmed = content.trim();
    let value = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value,
        Err(_) => {
            let span = EMBEDDED_OBJECT
                .find(trimmed)
                .ok_or_else(|| InquestError::contract(operation, "response contains no JSON object"))?;
            serde_json::from_str(span.as_str()).map_err(|e| {
                InquestError::contract(operation, format!("response is not valid JSON: {e}"))
            })?
        }
    };
    if !value.is_object() {
        return Err(InquestError::contract(operation, "response JSON is not an object"));
    }
    Ok(value)
}

fn decode<T: DeserializeOwned>(operation: ReasonerOperation, content: &str) -> Result<T, InquestError> {
    let value = extract_json(operation, content)?;
    serde_json::from_value(value)
        .map_err(|e| InquestError::contract(operation, format!("response does not match schema: {e}")))
}

pub fn parse_plan(content: &str) -> Result<Plan, InquestError> {
    let plan: Plan = decode(ReasonerOperation::Plan, content)?;
    plan.validate()?;
    Ok(plan)
}

pub fn parse_reflection(content: &str) -> Result<Reflection, InquestError> {
    let reflection: Reflection = decode(ReasonerOperation::Reflect, content)?;
    reflection.validate()?;
    Ok(reflection)
}

pub fn parse_synthesis(content: &str) -> Result<Synthesis, InquestError> {
    let synthesis: Synthesis = decode(ReasonerOperation::Summarize, content)?;
    synthesis.validate()?;
    Ok(synthesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_plan_parses() {
        let plan = parse_plan(
            r#"{"objective": "q", "steps": [
                {"id": "s1", "sub_question": "what", "tool": "hybrid_search", "tool_args": {"k": 3}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].tool_args["k"], 3);
    }

    #[test]
    fn fenced_object_is_extracted() {
        let content = "Here you go:\n```json\n{\"replan\": false, \"reason\": \"enough\"}\n```";
        let reflection = parse_reflection(content).unwrap();
        assert!(!reflection.replan);
        assert_eq!(reflection.reason, "enough");
    }

    #[test]
    fn empty_plan_is_rejected() {
        let err = parse_plan(r#"{"steps": []}"#).unwrap_err();
        assert_eq!(err.kind(), "reasoner_contract");
    }

    #[test]
    fn reflection_without_replan_is_rejected() {
        let err = parse_reflection(r#"{"reason": "looks fine"}"#).unwrap_err();
        assert!(err.to_string().contains("reflect"), "got: {err}");
    }

    #[test]
    fn synthesis_needs_answer() {
        assert!(parse_synthesis(r#"{"answer": "", "evidence_points": []}"#).is_err());
        let ok = parse_synthesis(r#"{"answer": "yes", "risks": ["small sample"]}"#).unwrap();
        assert_eq!(ok.risks, vec!["small sample"]);
        assert!(ok.citations.is_empty());
    }

    #[test]
    fn non_json_and_arrays_are_rejected() {
        assert!(extract_json(ReasonerOperation::Plan, "no json here").is_err());
        assert!(extract_json(ReasonerOperation::Plan, "[1, 2]").is_err());
        assert!(extract_json(ReasonerOperation::Plan, "{broken").is_err());
    }

    #[test]
    fn two_objects_in_prose_are_rejected() {
        let content = r#"first {"replan": false} then {"replan": true}"#;
        assert!(parse_reflection(content).is_err());
    }
}
