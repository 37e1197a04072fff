// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic reasoner stub for orchestrator tests.
//!
//! `ScriptedReasoner` pops responses from per-operation FIFO queues. When a
//! queue is empty it falls back to a fixed default: planning fails with a
//! contract error, reflection proceeds, and synthesis lists the evidence.
//! Every call is recorded for later assertions.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use inquest_core::{
    InquestError, Plan, PlanRequest, ReasonerOperation, Reasoner, ReflectRequest, Reflection,
    SummarizeRequest, Synthesis,
};
use tokio::sync::{Mutex, Semaphore};

/// One recorded reasoner call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonerCall {
    Plan { query: String },
    Reflect { step_index: usize, sub_question: String },
    Summarize { evidence: usize, memory_steps: usize },
}

#[derive(Default)]
struct Script {
    plans: VecDeque<Result<Plan, InquestError>>,
    reflections: VecDeque<Result<Reflection, InquestError>>,
    syntheses: VecDeque<Result<Synthesis, InquestError>>,
    calls: Vec<ReasonerCall>,
}

/// A reasoner that returns pre-configured responses.
#[derive(Clone, Default)]
pub struct ScriptedReasoner {
    script: Arc<Mutex<Script>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reasoner whose first plan is `plan`.
    pub fn with_plan(plan: Plan) -> Self {
        let reasoner = Self::new();
        reasoner
            .script
            .try_lock()
            .expect("fresh script is unlocked")
            .plans
            .push_back(Ok(plan));
        reasoner
    }

    /// Makes every call wait for a permit on the returned semaphore.
    ///
    /// The semaphore starts empty; call `add_permits` to release calls.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub async fn push_plan(&self, plan: Result<Plan, InquestError>) {
        self.script.lock().await.plans.push_back(plan);
    }

    pub async fn push_reflection(&self, reflection: Result<Reflection, InquestError>) {
        self.script.lock().await.reflections.push_back(reflection);
    }

    pub async fn push_synthesis(&self, synthesis: Result<Synthesis, InquestError>) {
        self.script.lock().await.syntheses.push_back(synthesis);
    }

    /// Queues an availability failure for the next call of `operation`.
    pub async fn fail_next(&self, operation: ReasonerOperation, message: &str) {
        let err = || InquestError::unavailable(operation, message);
        let mut script = self.script.lock().await;
        match operation {
            ReasonerOperation::Plan => script.plans.push_back(Err(err())),
            ReasonerOperation::Reflect => script.reflections.push_back(Err(err())),
            ReasonerOperation::Summarize => script.syntheses.push_back(Err(err())),
        }
    }

    pub async fn calls(&self) -> Vec<ReasonerCall> {
        self.script.lock().await.calls.clone()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }
    }
}

/// The default synthesis: one point per evidence item, cited in order.
pub fn echo_synthesis(request: &SummarizeRequest) -> Synthesis {
    let mut citations: Vec<String> = Vec::new();
    for hit in &request.evidence {
        if !citations.contains(&hit.paper_id) {
            citations.push(hit.paper_id.clone());
        }
    }
    Synthesis {
        answer: format!("scripted answer for: {}", request.query),
        evidence_points: request
            .evidence
            .iter()
            .map(|h| format!("[{}] {}", h.paper_id, h.title))
            .collect(),
        risks: vec![],
        citations,
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn plan(&self, request: &PlanRequest) -> Result<Plan, InquestError> {
        self.wait_for_gate().await;
        let mut script = self.script.lock().await;
        script.calls.push(ReasonerCall::Plan {
            query: request.query.clone(),
        });
        let plan = script.plans.pop_front().unwrap_or_else(|| {
            Err(InquestError::contract(ReasonerOperation::Plan, "no scripted plan"))
        })?;
        plan.validate()?;
        Ok(plan)
    }

    async fn reflect(&self, request: &ReflectRequest) -> Result<Reflection, InquestError> {
        self.wait_for_gate().await;
        let mut script = self.script.lock().await;
        script.calls.push(ReasonerCall::Reflect {
            step_index: request.step_index,
            sub_question: request.step.sub_question.clone(),
        });
        let reflection = script
            .reflections
            .pop_front()
            .unwrap_or_else(|| Ok(Reflection::proceed("scripted: proceed")))?;
        reflection.validate()?;
        Ok(reflection)
    }

    async fn summarize(&self, request: &SummarizeRequest) -> Result<Synthesis, InquestError> {
        self.wait_for_gate().await;
        let mut script = self.script.lock().await;
        script.calls.push(ReasonerCall::Summarize {
            evidence: request.evidence.len(),
            memory_steps: request.memory.step_count(),
        });
        let synthesis = script
            .syntheses
            .pop_front()
            .unwrap_or_else(|| Ok(echo_synthesis(request)))?;
        synthesis.validate()?;
        Ok(synthesis)
    }
}
