// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State machine tests driven by a scripted reasoner over the fixture dataset.

use std::sync::{Arc, Mutex};

use inquest_agent::{NoopObserver, Orchestrator, RunObserver, build_orchestrator};
use inquest_core::{
    InquestError, PolicyEvent, Progress, ReasonerOperation, Reflection, RunOptions, RunRequest,
    Stage, Step, TraceEntry,
};
use inquest_test_utils::fixtures::{corpus, graph_step, plan, search_step, test_config, timeline_step};
use inquest_test_utils::{ReasonerCall, ScriptedReasoner};
use tokio_util::sync::CancellationToken;

/// Observer that checks every callback against the progress published so far:
/// `step_index` and `total_steps` never move backwards and the trace never
/// outgrows the last reported `total_steps`.
#[derive(Default)]
struct Recorder {
    progress: Mutex<Vec<Progress>>,
    trace: Mutex<Vec<TraceEntry>>,
}

impl Recorder {
    fn stages(&self) -> Vec<Stage> {
        self.progress.lock().unwrap().iter().map(|p| p.stage).collect()
    }

    fn last_progress(&self) -> Progress {
        self.progress.lock().unwrap().last().cloned().unwrap()
    }

    fn assert_trace_within_progress(&self) {
        let executed = self.trace.lock().unwrap().len();
        if let Some(last) = self.progress.lock().unwrap().last() {
            assert!(
                executed <= last.total_steps,
                "trace has {executed} entries but progress reports {} steps",
                last.total_steps
            );
        }
    }
}

impl RunObserver for Recorder {
    fn progress(&self, progress: Progress) {
        {
            let mut seen = self.progress.lock().unwrap();
            if let Some(prev) = seen.last() {
                assert!(progress.step_index >= prev.step_index, "{prev:?} -> {progress:?}");
                assert!(progress.total_steps >= prev.total_steps, "{prev:?} -> {progress:?}");
            }
            seen.push(progress);
        }
        self.assert_trace_within_progress();
    }

    fn step_executed(&self, entry: TraceEntry) {
        self.trace.lock().unwrap().push(entry);
        self.assert_trace_within_progress();
    }

    fn step_reflected(&self, reflection: &Reflection) {
        if let Some(last) = self.trace.lock().unwrap().last_mut() {
            last.reflection = Some(reflection.clone());
        }
    }
}

fn orchestrator(reasoner: &ScriptedReasoner) -> Orchestrator {
    build_orchestrator(Arc::new(reasoner.clone()), Arc::new(test_config()))
}

fn request() -> RunRequest {
    RunRequest::new("citation hallucination in literature reviews")
}

fn follow_up(id: &str) -> Reflection {
    Reflection::replan_with(
        "coverage is narrow",
        vec![search_step(id, "hallucination audit limitations")],
    )
}

fn step_ids(steps: &[Step]) -> Vec<&str> {
    steps.iter().filter_map(|s| s.id.as_deref()).collect()
}

#[tokio::test]
async fn plan_failure_is_fatal() {
    let reasoner = ScriptedReasoner::new();
    reasoner.fail_next(ReasonerOperation::Plan, "connection refused").await;
    let err = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &NoopObserver, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "reasoner_unavailable");
    assert_eq!(reasoner.calls().await.len(), 1);
}

#[tokio::test]
async fn straight_plan_runs_every_step_then_summarizes() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        timeline_step("s1", "citation hallucination"),
        search_step("s2", "citation hallucination"),
        graph_step("s3", "lr-2023-hallucination"),
    ]));
    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.steps_executed, 3);
    assert_eq!(result.replans_used, 0);
    assert!(result.policy_events.is_empty());
    assert!(!result.evidence.is_empty());
    assert!(result.evidence.iter().all(|h| h.text.is_none()));
    assert!(!result.top_citations.is_empty());

    let trace = recorder.trace.lock().unwrap();
    assert_eq!(trace.len(), result.steps_executed);
    assert!(trace.len() <= result.plan.len());
    assert!(trace.iter().all(|e| e.reflection.is_some() && e.error.is_none()));
    assert!(trace.iter().all(|e| e.full_observation.is_none()));

    let stages = recorder.stages();
    assert_eq!(stages.first(), Some(&Stage::Planning));
    assert_eq!(stages.last(), Some(&Stage::Summarizing));
    assert_eq!(recorder.last_progress().total_steps, trace.len());

    let calls = reasoner.calls().await;
    assert!(matches!(calls.last(), Some(ReasonerCall::Summarize { .. })));
    let reflections = calls
        .iter()
        .filter(|c| matches!(c, ReasonerCall::Reflect { .. }))
        .count();
    assert_eq!(reflections, 3);
}

#[tokio::test]
async fn replanned_steps_follow_the_reflecting_step() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        search_step("s1", "retrieval grounding"),
        search_step("s2", "citation hallucination"),
        search_step("s3", "multilingual retrieval"),
    ]));
    reasoner.push_reflection(Ok(Reflection::proceed("fine"))).await;
    reasoner.push_reflection(Ok(follow_up("r1"))).await;

    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(step_ids(&result.plan.steps), vec!["s1", "s2", "r1", "s3"]);
    assert!(recorder.stages().contains(&Stage::Replanning));
    let last = recorder.last_progress();
    assert_eq!(last.total_steps, 4);
    assert_eq!(recorder.trace.lock().unwrap().len(), last.total_steps);
    assert_eq!(result.steps_executed, 4);
    assert_eq!(result.replans_used, 1);

    let reflected: Vec<usize> = reasoner
        .calls()
        .await
        .into_iter()
        .filter_map(|c| match c {
            ReasonerCall::Reflect { step_index, .. } => Some(step_index),
            _ => None,
        })
        .collect();
    assert_eq!(reflected, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn replan_on_last_step_appends_after_it() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        search_step("s0", "retrieval grounding"),
        search_step("s1", "citation hallucination"),
        search_step("s2", "multilingual retrieval"),
    ]));
    reasoner.push_reflection(Ok(Reflection::proceed("fine"))).await;
    reasoner.push_reflection(Ok(Reflection::proceed("fine"))).await;
    reasoner.push_reflection(Ok(follow_up("r2"))).await;

    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(step_ids(&result.plan.steps), vec!["s0", "s1", "s2", "r2"]);
    assert_eq!(result.replans_used, 1);
    let executed: Vec<usize> = recorder
        .trace
        .lock()
        .unwrap()
        .iter()
        .map(|e| e.step_index)
        .collect();
    assert_eq!(executed, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn replan_without_steps_consumes_no_budget() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![search_step("s1", "citation")]));
    reasoner
        .push_reflection(Ok(Reflection::replan_with("unsure", vec![])))
        .await;
    let result = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &NoopObserver, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.replans_used, 0);
    assert_eq!(result.plan.len(), 1);
}

#[tokio::test]
async fn exhausted_budget_summarizes_early() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        search_step("s1", "citation hallucination"),
        search_step("s2", "pdf parsing"),
    ]));
    for id in ["r1", "r2", "r3"] {
        reasoner.push_reflection(Ok(follow_up(id))).await;
    }
    let options = RunOptions {
        replan_budget: Some(2),
        ..RunOptions::default()
    };
    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request().with_options(options), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.replans_used, 2);
    assert_eq!(result.steps_executed, 3);
    assert_eq!(step_ids(&result.plan.steps), vec!["s1", "r1", "r2", "s2"]);
    assert_eq!(
        result.policy_events,
        vec![PolicyEvent::ReplanBudgetExceeded {
            budget: 2,
            step_index: 2
        }]
    );
    assert_eq!(recorder.trace.lock().unwrap().len(), 3);
    let last = recorder.last_progress();
    assert_eq!(last.stage, Stage::Summarizing);
    assert_eq!(last.step_index, 2);
    assert_eq!(last.total_steps, 4);
}

#[tokio::test]
async fn step_cap_stops_execution() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        search_step("s1", "a citation"),
        search_step("s2", "b retrieval"),
        search_step("s3", "c audit"),
    ]));
    let options = RunOptions {
        max_steps: Some(2),
        ..RunOptions::default()
    };
    let result = orchestrator(&reasoner)
        .run("r", &request().with_options(options), corpus(), &NoopObserver, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.steps_executed, 2);
    assert_eq!(
        result.policy_events,
        vec![PolicyEvent::MaxStepsReached {
            max_steps: 2,
            pending_steps: 1
        }]
    );
}

#[tokio::test]
async fn unknown_tool_is_recorded_and_run_continues() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        Step::new("search the web", "web_search", serde_json::json!({"q": "x"})).with_id("s1"),
        search_step("s2", "citation hallucination"),
    ]));
    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.steps_executed, 2);
    let trace = recorder.trace.lock().unwrap();
    let failed = &trace[0];
    assert!(failed.error.as_deref().unwrap().contains("web_search"));
    assert!(failed.observation.ambiguity.low_coverage);
    assert!(failed.observation.ambiguity.conflicting_stances);
    assert_eq!(failed.observation.hit_count, 0);
    assert!(failed.reflection.is_some());
    assert!(trace[1].error.is_none());
}

#[tokio::test]
async fn bad_tool_arguments_fail_only_the_step() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![graph_step("s1", "lr-does-not-exist")]));
    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.steps_executed, 1);
    assert!(recorder.trace.lock().unwrap()[0].error.is_some());
}

#[tokio::test]
async fn reflection_contract_violation_is_fatal() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![search_step("s1", "citation")]));
    reasoner
        .push_reflection(Err(InquestError::contract(
            ReasonerOperation::Reflect,
            "replan is not a boolean",
        )))
        .await;
    let err = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &NoopObserver, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "reasoner_contract");
}

#[tokio::test]
async fn failure_after_first_step_keeps_trace_within_progress() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![
        search_step("s1", "citation hallucination"),
        search_step("s2", "retrieval grounding"),
        search_step("s3", "multilingual retrieval"),
    ]));
    reasoner.push_reflection(Ok(Reflection::proceed("fine"))).await;
    reasoner
        .push_reflection(Err(InquestError::contract(
            ReasonerOperation::Reflect,
            "missing reason",
        )))
        .await;

    let recorder = Recorder::default();
    let err = orchestrator(&reasoner)
        .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "reasoner_contract");
    assert_eq!(recorder.trace.lock().unwrap().len(), 2);
    let last = recorder.last_progress();
    assert_eq!(last.stage, Stage::Reflecting);
    assert_eq!(last.step_index, 1);
    assert_eq!(last.total_steps, 3);
}

#[tokio::test]
async fn full_trace_keeps_hit_text() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![search_step("s1", "citation hallucination")]));
    let options = RunOptions {
        full_trace: true,
        ..RunOptions::default()
    };
    let recorder = Recorder::default();
    let result = orchestrator(&reasoner)
        .run("r", &request().with_options(options), corpus(), &recorder, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.evidence.iter().all(|h| h.text.is_some()));
    let trace = recorder.trace.lock().unwrap();
    let full = trace[0].full_observation.as_ref().unwrap();
    assert!(!full.hits.is_empty());
    assert!(full.hits.iter().all(|h| h.text.is_some()));
}

#[tokio::test]
async fn identical_inputs_give_identical_runs() {
    let script = || {
        ScriptedReasoner::with_plan(plan(vec![
            timeline_step("s1", "literature review automation"),
            search_step("s2", "citation hallucination"),
            Step::new(
                "lineage",
                "citation_graph",
                serde_json::json!({"paper_id": "auto", "direction": "both"}),
            )
            .with_id("s3"),
        ]))
    };

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let reasoner = script();
        reasoner.push_reflection(Ok(Reflection::proceed("ok"))).await;
        reasoner.push_reflection(Ok(follow_up("r1"))).await;
        let recorder = Recorder::default();
        let result = orchestrator(&reasoner)
            .run("r", &request(), corpus(), &recorder, &CancellationToken::new())
            .await
            .unwrap();
        let trace = recorder.trace.lock().unwrap().clone();
        outcomes.push((result, trace));
    }
    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn cancelled_token_stops_before_the_next_step() {
    let reasoner = ScriptedReasoner::with_plan(plan(vec![search_step("s1", "citation")]));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = orchestrator(&reasoner)
        .run("run-7", &request(), corpus(), &NoopObserver, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, InquestError::Cancelled { run_id } if run_id == "run-7"));
    assert!(
        !reasoner
            .calls()
            .await
            .iter()
            .any(|c| matches!(c, ReasonerCall::Reflect { .. }))
    );
}

#[tokio::test]
async fn summary_sees_compressed_memory() {
    let steps = (0..6)
        .map(|i| search_step(&format!("s{i}"), "citation hallucination retrieval"))
        .collect();
    let reasoner = ScriptedReasoner::with_plan(plan(steps));
    orchestrator(&reasoner)
        .run("r", &request(), corpus(), &NoopObserver, &CancellationToken::new())
        .await
        .unwrap();

    let calls = reasoner.calls().await;
    let Some(ReasonerCall::Summarize {
        evidence,
        memory_steps,
    }) = calls.last()
    else {
        panic!("last call should be summarize: {calls:?}");
    };
    assert!(*evidence > 0);
    assert_eq!(*memory_steps, 6);
}
