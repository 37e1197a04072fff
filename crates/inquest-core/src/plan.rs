// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plans, reflections, and syntheses: the three shapes the reasoner returns.
//!
//! Each shape has a `validate` method enforcing the parts of the contract that
//! serde cannot express. A response that fails validation is a
//! [`InquestError::ReasonerContract`] and is never partially accepted.

use serde::{Deserialize, Serialize};

use crate::error::InquestError;
use crate::types::ReasonerOperation;

fn default_tool_args() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// One sub-question plus the tool invocation that answers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sub_question: String,
    pub tool: String,
    #[serde(default = "default_tool_args")]
    pub tool_args: serde_json::Value,
}

impl Step {
    /// Creates a step with the given tool arguments.
    pub fn new(
        sub_question: impl Into<String>,
        tool: impl Into<String>,
        tool_args: serde_json::Value,
    ) -> Self {
        Self {
            id: None,
            sub_question: sub_question.into(),
            tool: tool.into(),
            tool_args,
        }
    }

    /// Sets the step id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn validate(&self, operation: ReasonerOperation, position: usize) -> Result<(), InquestError> {
        if self.tool.trim().is_empty() {
            return Err(InquestError::contract(
                operation,
                format!("step {position} has an empty tool name"),
            ));
        }
        if self.sub_question.trim().is_empty() {
            return Err(InquestError::contract(
                operation,
                format!("step {position} has an empty sub_question"),
            ));
        }
        if !self.tool_args.is_object() {
            return Err(InquestError::contract(
                operation,
                format!("step {position} tool_args must be an object"),
            ));
        }
        Ok(())
    }
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            objective: None,
            steps,
        }
    }

    /// Checks the plan contract: at least one step, each with a tool and sub-question.
    pub fn validate(&self) -> Result<(), InquestError> {
        if self.steps.is_empty() {
            return Err(InquestError::contract(
                ReasonerOperation::Plan,
                "plan contains no steps",
            ));
        }
        for (i, step) in self.steps.iter().enumerate() {
            step.validate(ReasonerOperation::Plan, i)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Inserts `new_steps` immediately after `index`, shifting the unexecuted tail.
    ///
    /// Steps at or before `index` are untouched.
    pub fn insert_after(&mut self, index: usize, new_steps: Vec<Step>) {
        let at = (index + 1).min(self.steps.len());
        self.steps.splice(at..at, new_steps);
    }
}

/// Ambiguity indicators attached to observations and reflections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    #[serde(default)]
    pub low_coverage: bool,
    #[serde(default)]
    pub conflicting_stances: bool,
}

impl Ambiguity {
    /// Ambiguity forced onto a step whose tool call failed.
    pub fn forced() -> Self {
        Self {
            low_coverage: true,
            conflicting_stances: false,
        }
    }

    pub fn any(&self) -> bool {
        self.low_coverage || self.conflicting_stances
    }

    pub fn merge(self, other: Ambiguity) -> Ambiguity {
        Ambiguity {
            low_coverage: self.low_coverage || other.low_coverage,
            conflicting_stances: self.conflicting_stances || other.conflicting_stances,
        }
    }
}

/// The reasoner's judgment of evidence sufficiency after a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(default)]
    pub ambiguity: Ambiguity,
    pub replan: bool,
    #[serde(default)]
    pub new_steps: Vec<Step>,
    #[serde(default)]
    pub reason: String,
}

impl Reflection {
    /// A reflection that accepts the evidence and continues.
    pub fn proceed(reason: impl Into<String>) -> Self {
        Self {
            ambiguity: Ambiguity::default(),
            replan: false,
            new_steps: Vec::new(),
            reason: reason.into(),
        }
    }

    /// A reflection that asks for the given follow-up steps.
    pub fn replan_with(reason: impl Into<String>, new_steps: Vec<Step>) -> Self {
        Self {
            ambiguity: Ambiguity::default(),
            replan: true,
            new_steps,
            reason: reason.into(),
        }
    }

    pub fn validate(&self) -> Result<(), InquestError> {
        for (i, step) in self.new_steps.iter().enumerate() {
            step.validate(ReasonerOperation::Reflect, i)?;
        }
        Ok(())
    }

    /// True when the reflection both asks for a replan and supplies steps.
    pub fn wants_insertion(&self) -> bool {
        self.replan && !self.new_steps.is_empty()
    }
}

/// The final synthesis returned by the reasoner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub answer: String,
    #[serde(default)]
    pub evidence_points: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub citations: Vec<String>,
}

impl Synthesis {
    pub fn validate(&self) -> Result<(), InquestError> {
        if self.answer.trim().is_empty() {
            return Err(InquestError::contract(
                ReasonerOperation::Summarize,
                "synthesis answer is empty",
            ));
        }
        Ok(())
    }
}
