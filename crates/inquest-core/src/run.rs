// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run lifecycle types: status, progress, trace entries, requests, and results.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::InquestError;
use crate::observation::{Hit, Observation, ObservationSummary};
use crate::plan::{Plan, Reflection, Step, Synthesis};
use crate::types::CitationCount;

/// Externally visible run status.
///
/// Transitions are monotonic: `queued -> running -> {completed | failed}`,
/// plus `queued -> failed` for runs cancelled before they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// Returns true if moving from `self` to `next` respects the lifecycle order.
    pub fn can_transition_to(&self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (RunStatus::Queued, RunStatus::Running)
                | (RunStatus::Queued, RunStatus::Failed)
                | (RunStatus::Running, RunStatus::Completed)
                | (RunStatus::Running, RunStatus::Failed)
        )
    }
}

/// Internal orchestrator stage, finer grained than [`RunStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Queued,
    Planning,
    Executing,
    Reflecting,
    Replanning,
    Summarizing,
    Completed,
    Failed,
}

/// Progress snapshot published at every orchestrator transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub stage: Stage,
    pub step_index: usize,
    pub total_steps: usize,
    pub message: String,
}

impl Progress {
    pub fn queued() -> Self {
        Self {
            stage: Stage::Queued,
            step_index: 0,
            total_steps: 0,
            message: "waiting for a worker slot".to_string(),
        }
    }
}

/// Compact record of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step_index: usize,
    pub step: Step,
    pub observation: ObservationSummary,
    /// Full observation including hit text, present only for full-trace runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_observation: Option<Observation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<Reflection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-run overrides supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunOptions {
    /// Keep raw hit text in the trace and result.
    #[serde(default)]
    pub full_trace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replan_budget: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

/// A request to start a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub query: String,
    /// Dataset location. `None` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default)]
    pub options: RunOptions,
}

impl RunRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            data_path: None,
            options: RunOptions::default(),
        }
    }

    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Rejects requests that can never produce a run.
    pub fn validate(&self) -> Result<(), InquestError> {
        if self.query.trim().is_empty() {
            return Err(InquestError::InvalidRequest("query must not be empty".into()));
        }
        if self.options.top_k == Some(0) {
            return Err(InquestError::InvalidRequest("options.top_k must be at least 1".into()));
        }
        if self.options.max_steps == Some(0) {
            return Err(InquestError::InvalidRequest(
                "options.max_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A policy decision that changed the course of a run without failing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PolicyEvent {
    /// A reflection asked for a replan after the budget was spent.
    ReplanBudgetExceeded { budget: usize, step_index: usize },
    /// The step cap was hit with steps still pending.
    MaxStepsReached { max_steps: usize, pending_steps: usize },
}

/// The final result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub query: String,
    pub plan: Plan,
    pub synthesis: Synthesis,
    pub top_citations: Vec<CitationCount>,
    pub evidence: Vec<Hit>,
    pub steps_executed: usize,
    pub replans_used: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_events: Vec<PolicyEvent>,
}

/// Why a run ended in `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    pub kind: String,
    pub message: String,
}

impl From<&InquestError> for RunFailure {
    fn from(err: &InquestError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
