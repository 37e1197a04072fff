// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Inquest research orchestrator.

use thiserror::Error;

use crate::types::ReasonerOperation;

/// The primary error type used across the Inquest workspace.
///
/// Variants fall into three propagation classes:
/// - step-level ([`UnknownTool`](Self::UnknownTool), [`ToolFailed`](Self::ToolFailed)):
///   recorded in the trace, orchestration continues.
/// - run-fatal (reasoner, dataset, cancellation, internal): the run ends in `failed`.
/// - policy events ([`ReplanBudgetExceeded`](Self::ReplanBudgetExceeded)): not a
///   failure, forces early summarization.
#[derive(Debug, Error)]
pub enum InquestError {
    /// Configuration errors (invalid TOML, bad values, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// The dataset could not be loaded (missing file, bad JSON, duplicate ids).
    #[error("dataset error ({path}): {message}")]
    Dataset {
        path: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The reasoner answered, but the response violates the expected schema.
    #[error("reasoner contract violated during {operation}: {message}")]
    ReasonerContract {
        operation: ReasonerOperation,
        message: String,
    },

    /// The reasoner could not be reached (network, auth, timeout, non-2xx).
    #[error("reasoner unavailable during {operation}: {message}")]
    ReasonerUnavailable {
        operation: ReasonerOperation,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A step requested a tool that is not registered.
    #[error("unknown tool `{name}`")]
    UnknownTool { name: String },

    /// A registered tool rejected its arguments or could not produce an observation.
    #[error("tool `{tool}` failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// The per-run replan budget is spent.
    #[error("replan budget of {budget} exhausted")]
    ReplanBudgetExceeded { budget: usize },

    /// Status or cancel request for a run id the registry never issued.
    #[error("run not found: {run_id}")]
    RunNotFound { run_id: String },

    /// The run was cancelled by a caller before it finished.
    #[error("run {run_id} was cancelled")]
    Cancelled { run_id: String },

    /// A caller-supplied request is malformed (empty query, bad options).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl InquestError {
    /// Shorthand for a reasoner contract violation.
    pub fn contract(operation: ReasonerOperation, message: impl Into<String>) -> Self {
        Self::ReasonerContract {
            operation,
            message: message.into(),
        }
    }

    /// Shorthand for a reasoner availability failure without an underlying source.
    pub fn unavailable(operation: ReasonerOperation, message: impl Into<String>) -> Self {
        Self::ReasonerUnavailable {
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a step-level tool failure.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Stable snake_case identifier for the variant, used in API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Dataset { .. } => "dataset",
            Self::ReasonerContract { .. } => "reasoner_contract",
            Self::ReasonerUnavailable { .. } => "reasoner_unavailable",
            Self::UnknownTool { .. } => "unknown_tool",
            Self::ToolFailed { .. } => "tool_failed",
            Self::ReplanBudgetExceeded { .. } => "replan_budget_exceeded",
            Self::RunNotFound { .. } => "run_not_found",
            Self::Cancelled { .. } => "cancelled",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns true for failures that only affect the current step.
    pub fn is_step_recoverable(&self) -> bool {
        matches!(self, Self::UnknownTool { .. } | Self::ToolFailed { .. })
    }

    /// Returns true for failures that must end the run in `failed`.
    pub fn is_run_fatal(&self) -> bool {
        !self.is_step_recoverable() && !matches!(self, Self::ReplanBudgetExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_errors_are_step_recoverable() {
        let unknown = InquestError::UnknownTool {
            name: "web_search".into(),
        };
        let failed = InquestError::tool_failed("timeline", "no papers");
        assert!(unknown.is_step_recoverable());
        assert!(failed.is_step_recoverable());
        assert!(!unknown.is_run_fatal());
        assert!(!failed.is_run_fatal());
    }

    #[test]
    fn reasoner_errors_are_run_fatal() {
        let contract = InquestError::contract(ReasonerOperation::Plan, "missing steps");
        let unavailable = InquestError::unavailable(ReasonerOperation::Summarize, "timeout");
        assert!(contract.is_run_fatal());
        assert!(unavailable.is_run_fatal());
        assert_eq!(contract.kind(), "reasoner_contract");
        assert_eq!(unavailable.kind(), "reasoner_unavailable");
    }

    #[test]
    fn replan_budget_is_neither_fatal_nor_step_failure() {
        let event = InquestError::ReplanBudgetExceeded { budget: 2 };
        assert!(!event.is_run_fatal());
        assert!(!event.is_step_recoverable());
    }

    #[test]
    fn display_mentions_operation() {
        let err = InquestError::contract(ReasonerOperation::Reflect, "replan is not a boolean");
        assert_eq!(
            err.to_string(),
            "reasoner contract violated during reflect: replan is not a boolean"
        );
    }
}
