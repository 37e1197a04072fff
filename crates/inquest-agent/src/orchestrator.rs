// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plan -> execute -> reflect -> replan -> summarize state machine.
//!
//! Steps of one run execute strictly in sequence. Replanned steps are spliced
//! in immediately after the step whose reflection requested them. The replan
//! budget and the step cap guarantee termination. Cancellation is checked
//! between steps, never during a tool call or reasoner call.

use std::sync::Arc;

use inquest_config::InquestConfig;
use inquest_core::{
    InquestError, ObservationSummary, PlanRequest, PolicyEvent, Progress, Reasoner,
    ReflectRequest, Reflection, RunRequest, RunResult, Stage, SummarizeRequest, TraceEntry,
};
use inquest_corpus::{Corpus, HybridRetriever};
use inquest_memory::ContextMemory;
use inquest_tools::{ToolContext, ToolRegistry};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::evidence::EvidencePool;

/// Receives a run's observable state as the orchestrator advances.
///
/// Implementations must be cheap; they are called inline between steps.
pub trait RunObserver: Send + Sync {
    fn progress(&self, progress: Progress);

    /// A step finished executing. Called once per executed step, in order.
    fn step_executed(&self, entry: TraceEntry);

    /// The reflection for the most recently executed step.
    fn step_reflected(&self, reflection: &Reflection);
}

/// Observer that discards everything.
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn progress(&self, _progress: Progress) {}
    fn step_executed(&self, _entry: TraceEntry) {}
    fn step_reflected(&self, _reflection: &Reflection) {}
}

/// Drives single runs. Shared by all runs of a registry.
pub struct Orchestrator {
    reasoner: Arc<dyn Reasoner>,
    tools: Arc<ToolRegistry>,
    config: Arc<InquestConfig>,
}

/// Limits in force for one run, after request overrides.
#[derive(Debug, Clone, Copy)]
struct RunLimits {
    top_k: usize,
    replan_budget: usize,
    max_steps: usize,
}

impl Orchestrator {
    pub fn new(reasoner: Arc<dyn Reasoner>, tools: Arc<ToolRegistry>, config: Arc<InquestConfig>) -> Self {
        Self {
            reasoner,
            tools,
            config,
        }
    }

    pub fn config(&self) -> &InquestConfig {
        &self.config
    }

    pub fn reasoner_name(&self) -> &str {
        self.reasoner.name()
    }

    fn limits(&self, request: &RunRequest) -> RunLimits {
        let options = &request.options;
        RunLimits {
            top_k: options.top_k.unwrap_or(self.config.retrieval.top_k).max(1),
            replan_budget: options
                .replan_budget
                .unwrap_or(self.config.orchestrator.replan_budget),
            max_steps: options
                .max_steps
                .unwrap_or(self.config.orchestrator.max_steps)
                .max(1),
        }
    }

    /// Runs `request` against `corpus` to completion.
    ///
    /// Returns the result, or the run-fatal error that ended the run.
    pub async fn run(
        &self,
        run_id: &str,
        request: &RunRequest,
        corpus: Arc<Corpus>,
        observer: &dyn RunObserver,
        cancel: &CancellationToken,
    ) -> Result<RunResult, InquestError> {
        let limits = self.limits(request);
        let retrieval = &self.config.retrieval;
        let retriever = HybridRetriever::new(corpus, retrieval.alpha, retrieval.score_precision);
        let mut memory = ContextMemory::new(&self.config.memory);
        let query = request.query.trim().to_string();

        observer.progress(Progress {
            stage: Stage::Planning,
            step_index: 0,
            total_steps: 0,
            message: "requesting plan".into(),
        });
        let mut plan = self
            .reasoner
            .plan(&PlanRequest {
                query: query.clone(),
                capabilities: self.tools.describe(),
                memory: memory.snapshot(),
            })
            .await?;
        plan.validate()?;
        info!(run_id, steps = plan.len(), reasoner = self.reasoner.name(), "plan accepted");

        let mut pool = EvidencePool::new();
        let mut policy_events = Vec::new();
        let mut last_primary_paper: Option<String> = None;
        let mut replans_used = 0;
        let mut steps_executed = 0;
        let mut index = 0;

        while index < plan.len() {
            check_cancelled(run_id, cancel)?;
            if steps_executed >= limits.max_steps {
                let pending_steps = plan.len() - index;
                warn!(run_id, max_steps = limits.max_steps, pending_steps, "step cap reached");
                policy_events.push(PolicyEvent::MaxStepsReached {
                    max_steps: limits.max_steps,
                    pending_steps,
                });
                break;
            }

            let step = plan.steps[index].clone();
            observer.progress(Progress {
                stage: Stage::Executing,
                step_index: index,
                total_steps: plan.len(),
                message: format!("{}: {}", step.tool, step.sub_question),
            });

            let ctx = ToolContext {
                retriever: retriever.clone(),
                sub_question: step.sub_question.clone(),
                default_k: limits.top_k,
                last_primary_paper: last_primary_paper.clone(),
            };
            let (summary, full_observation, error) =
                match self.tools.invoke(&step.tool, &ctx, &step.tool_args).await {
                    Ok(observation) => {
                        if let Some(primary) = observation.primary_paper() {
                            last_primary_paper = Some(primary.to_string());
                        }
                        pool.extend(&observation.hits);
                        let summary = observation.summarize(retrieval.top_hits);
                        memory.record(index, &step, summary.clone(), &observation.citations);
                        let full = request.options.full_trace.then_some(observation);
                        (summary, full, None)
                    }
                    Err(err) if err.is_step_recoverable() => {
                        warn!(run_id, step_index = index, tool = %step.tool, error = %err, "step failed");
                        let summary = ObservationSummary::failed(step.tool.clone(), err.to_string());
                        memory.record(index, &step, summary.clone(), &[]);
                        (summary, None, Some(err.to_string()))
                    }
                    Err(err) => return Err(err),
                };
            steps_executed += 1;
            observer.step_executed(TraceEntry {
                step_index: index,
                step: step.clone(),
                observation: summary.clone(),
                full_observation,
                reflection: None,
                error,
            });

            observer.progress(Progress {
                stage: Stage::Reflecting,
                step_index: index,
                total_steps: plan.len(),
                message: format!("assessing evidence for step {index}"),
            });
            let reflection = self
                .reasoner
                .reflect(&ReflectRequest {
                    query: query.clone(),
                    step_index: index,
                    step,
                    observation: summary,
                    memory: memory.snapshot(),
                })
                .await?;
            reflection.validate()?;
            memory.attach_reflection(&reflection);
            observer.step_reflected(&reflection);
            debug!(run_id, step_index = index, replan = reflection.replan, reason = %reflection.reason, "reflection");

            if reflection.wants_insertion() {
                if replans_used >= limits.replan_budget {
                    let exceeded = InquestError::ReplanBudgetExceeded {
                        budget: limits.replan_budget,
                    };
                    info!(run_id, step_index = index, "{exceeded}; summarizing early");
                    policy_events.push(PolicyEvent::ReplanBudgetExceeded {
                        budget: limits.replan_budget,
                        step_index: index,
                    });
                    break;
                }
                let added = reflection.new_steps.len();
                plan.insert_after(index, reflection.new_steps);
                replans_used += 1;
                observer.progress(Progress {
                    stage: Stage::Replanning,
                    step_index: index,
                    total_steps: plan.len(),
                    message: format!("inserted {added} step(s) after step {index}"),
                });
            }
            index += 1;
        }

        check_cancelled(run_id, cancel)?;
        observer.progress(Progress {
            stage: Stage::Summarizing,
            step_index: index.min(plan.len()),
            total_steps: plan.len(),
            message: "requesting synthesis".into(),
        });
        let evidence = pool.top(self.config.orchestrator.evidence_limit);
        let synthesis = self
            .reasoner
            .summarize(&SummarizeRequest {
                query: query.clone(),
                memory: memory.snapshot(),
                evidence: evidence.clone(),
            })
            .await?;
        synthesis.validate()?;

        let evidence = if request.options.full_trace {
            evidence
        } else {
            evidence.iter().map(|h| h.without_text()).collect()
        };
        info!(
            run_id,
            steps_executed,
            replans_used,
            distinct_papers = memory.distinct_papers(),
            "run synthesized"
        );
        Ok(RunResult {
            query,
            plan,
            synthesis,
            top_citations: memory.top_citations(self.config.orchestrator.citation_limit),
            evidence,
            steps_executed,
            replans_used,
            policy_events,
        })
    }
}

fn check_cancelled(run_id: &str, cancel: &CancellationToken) -> Result<(), InquestError> {
    if cancel.is_cancelled() {
        return Err(InquestError::Cancelled {
            run_id: run_id.to_string(),
        });
    }
    Ok(())
}
