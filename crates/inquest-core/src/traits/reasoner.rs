// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The external reasoner capability consumed by the orchestrator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InquestError;
use crate::memory::MemorySnapshot;
use crate::observation::{Hit, ObservationSummary};
use crate::plan::{Plan, Reflection, Step, Synthesis};
use crate::types::Capabilities;

/// Input for [`Reasoner::plan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub query: String,
    pub capabilities: Capabilities,
    pub memory: MemorySnapshot,
}

/// Input for [`Reasoner::reflect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectRequest {
    pub query: String,
    pub step_index: usize,
    pub step: Step,
    pub observation: ObservationSummary,
    pub memory: MemorySnapshot,
}

/// Input for [`Reasoner::summarize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub query: String,
    pub memory: MemorySnapshot,
    /// Best pooled evidence across all steps, highest score first.
    pub evidence: Vec<Hit>,
}

/// A planning, reflection, and synthesis oracle.
///
/// Implementations must return values that pass the corresponding `validate`
/// method, or fail with [`InquestError::ReasonerContract`] /
/// [`InquestError::ReasonerUnavailable`]. They must never fabricate a local
/// answer to mask a failed call.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Short identifier used in logs (`openai-compatible`, `heuristic`, ...).
    fn name(&self) -> &str;

    /// Produces the initial plan for a query.
    async fn plan(&self, request: &PlanRequest) -> Result<Plan, InquestError>;

    /// Judges whether the evidence so far is sufficient after a step.
    async fn reflect(&self, request: &ReflectRequest) -> Result<Reflection, InquestError>;

    /// Produces the final synthesis from the accumulated memory.
    async fn summarize(&self, request: &SummarizeRequest) -> Result<Synthesis, InquestError>;
}
