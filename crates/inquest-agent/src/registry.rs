// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run registry: asynchronous submission, polling, synchronous runs, and
//! cancellation.
//!
//! Each run is driven by its own task. A semaphore bounds how many runs
//! execute at once; the rest stay `queued` without blocking the submitter.
//! Every run entry is written only by its own task (and by `cancel` while
//! still queued); readers receive cloned snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use inquest_core::{
    InquestError, Progress, Reflection, RunFailure, RunRequest, RunResult, RunStatus, Stage,
    TraceEntry,
};
use inquest_corpus::CorpusCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::orchestrator::{Orchestrator, RunObserver};

/// Returned by [`RunRegistry::submit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub run_id: String,
    pub status: RunStatus,
}

/// Point-in-time view of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: String,
    pub query: String,
    pub status: RunStatus,
    pub progress: Progress,
    pub execution_trace: Vec<TraceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RunResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

struct RunEntry {
    snapshot: RunSnapshot,
    cancel: CancellationToken,
}

type RunTable = DashMap<String, RunEntry>;

/// Registry of all runs in this process. Entries are never evicted.
pub struct RunRegistry {
    runs: Arc<RunTable>,
    orchestrator: Arc<Orchestrator>,
    corpora: Arc<CorpusCache>,
    permits: Arc<Semaphore>,
    default_data_path: String,
}

impl RunRegistry {
    pub fn new(orchestrator: Arc<Orchestrator>, corpora: Arc<CorpusCache>) -> Self {
        let config = orchestrator.config();
        let max_concurrent = config.orchestrator.max_concurrent_runs.max(1);
        let default_data_path = config.gateway.default_data_path.clone();
        Self {
            runs: Arc::new(DashMap::new()),
            orchestrator,
            corpora,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            default_data_path,
        }
    }

    pub fn default_data_path(&self) -> &str {
        &self.default_data_path
    }

    /// Queues a run and returns immediately.
    pub fn submit(&self, request: RunRequest) -> Result<RunHandle, InquestError> {
        let (handle, _task) = self.spawn(request)?;
        Ok(handle)
    }

    /// Runs to completion and returns the result or the run's error.
    ///
    /// The run is registered like a submitted one and can be polled meanwhile.
    /// Dropping the returned future does not stop the run.
    pub async fn run_sync(&self, request: RunRequest) -> Result<(String, RunResult), InquestError> {
        let (handle, task) = self.spawn(request)?;
        let outcome = task
            .await
            .map_err(|e| InquestError::Internal(format!("run task failed: {e}")))?;
        outcome.map(|result| (handle.run_id, result))
    }

    /// Current snapshot of `run_id`.
    pub fn get(&self, run_id: &str) -> Result<RunSnapshot, InquestError> {
        self.runs
            .get(run_id)
            .map(|entry| entry.snapshot.clone())
            .ok_or_else(|| InquestError::RunNotFound {
                run_id: run_id.to_string(),
            })
    }

    /// Requests cancellation. Terminal runs are left untouched.
    ///
    /// Returns the run's status at the time of the call.
    pub fn cancel(&self, run_id: &str) -> Result<RunStatus, InquestError> {
        let entry = self.runs.get(run_id).ok_or_else(|| InquestError::RunNotFound {
            run_id: run_id.to_string(),
        })?;
        let status = entry.snapshot.status;
        if !status.is_terminal() {
            info!(run_id, %status, "cancellation requested");
            entry.cancel.cancel();
        }
        Ok(status)
    }

    /// Cancels every run that has not finished.
    pub fn cancel_all(&self) -> usize {
        let mut cancelled = 0;
        for entry in self.runs.iter() {
            if !entry.snapshot.status.is_terminal() {
                entry.cancel.cancel();
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Number of runs that are queued or running.
    pub fn active(&self) -> usize {
        self.runs
            .iter()
            .filter(|entry| !entry.snapshot.status.is_terminal())
            .count()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn spawn(
        &self,
        request: RunRequest,
    ) -> Result<(RunHandle, JoinHandle<Result<RunResult, InquestError>>), InquestError> {
        request.validate()?;
        let run_id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let cancel = CancellationToken::new();
        self.runs.insert(
            run_id.clone(),
            RunEntry {
                snapshot: RunSnapshot {
                    run_id: run_id.clone(),
                    query: request.query.clone(),
                    status: RunStatus::Queued,
                    progress: Progress::queued(),
                    execution_trace: Vec::new(),
                    result: None,
                    error: None,
                    created_at: now,
                    updated_at: now,
                },
                cancel: cancel.clone(),
            },
        );
        info!(run_id = %run_id, "run queued");

        let writer = RunWriter {
            runs: self.runs.clone(),
            run_id: run_id.clone(),
        };
        let orchestrator = self.orchestrator.clone();
        let corpora = self.corpora.clone();
        let permits = self.permits.clone();
        let data_path = request
            .data_path
            .clone()
            .unwrap_or_else(|| self.default_data_path.clone());

        let task = tokio::spawn(async move {
            let outcome =
                drive(&writer, &orchestrator, &corpora, &permits, &request, &data_path, &cancel).await;
            match &outcome {
                Ok(result) => writer.complete(result.clone()),
                Err(err) => writer.fail(err),
            }
            outcome
        });

        Ok((
            RunHandle {
                run_id,
                status: RunStatus::Queued,
            },
            task,
        ))
    }
}

async fn drive(
    writer: &RunWriter,
    orchestrator: &Orchestrator,
    corpora: &CorpusCache,
    permits: &Arc<Semaphore>,
    request: &RunRequest,
    data_path: &str,
    cancel: &CancellationToken,
) -> Result<RunResult, InquestError> {
    let cancelled = || InquestError::Cancelled {
        run_id: writer.run_id.clone(),
    };
    let _permit = tokio::select! {
        permit = permits.clone().acquire_owned() => {
            permit.map_err(|_| InquestError::Internal("run scheduler is closed".into()))?
        }
        _ = cancel.cancelled() => return Err(cancelled()),
    };
    if cancel.is_cancelled() {
        return Err(cancelled());
    }

    writer.start();
    let corpus = corpora.get(std::path::Path::new(data_path)).await?;
    orchestrator
        .run(&writer.run_id, request, corpus, writer, cancel)
        .await
}

/// Writes one run's entry in the table.
struct RunWriter {
    runs: Arc<RunTable>,
    run_id: String,
}

impl RunWriter {
    fn update(&self, apply: impl FnOnce(&mut RunSnapshot)) {
        if let Some(mut entry) = self.runs.get_mut(&self.run_id) {
            apply(&mut entry.snapshot);
            entry.snapshot.updated_at = Utc::now();
        }
    }

    fn transition(snapshot: &mut RunSnapshot, next: RunStatus) -> bool {
        if snapshot.status.can_transition_to(next) {
            snapshot.status = next;
            true
        } else {
            warn!(
                run_id = %snapshot.run_id,
                from = %snapshot.status,
                to = %next,
                "ignored invalid status transition"
            );
            false
        }
    }

    fn start(&self) {
        self.update(|s| {
            Self::transition(s, RunStatus::Running);
        });
        info!(run_id = %self.run_id, "run started");
    }

    fn complete(&self, result: RunResult) {
        self.update(|s| {
            if Self::transition(s, RunStatus::Completed) {
                s.progress = Progress {
                    stage: Stage::Completed,
                    step_index: s.progress.step_index,
                    total_steps: result.plan.len(),
                    message: "completed".into(),
                };
                s.result = Some(result);
            }
        });
        info!(run_id = %self.run_id, "run completed");
    }

    fn fail(&self, err: &InquestError) {
        self.update(|s| {
            if Self::transition(s, RunStatus::Failed) {
                s.progress = Progress {
                    stage: Stage::Failed,
                    step_index: s.progress.step_index,
                    total_steps: s.progress.total_steps,
                    message: err.to_string(),
                };
                s.error = Some(RunFailure::from(err));
            }
        });
        match err {
            InquestError::Cancelled { .. } => info!(run_id = %self.run_id, "run cancelled"),
            _ => error!(run_id = %self.run_id, kind = err.kind(), error = %err, "run failed"),
        }
    }
}

impl RunObserver for RunWriter {
    fn progress(&self, progress: Progress) {
        self.update(|s| s.progress = progress);
    }

    fn step_executed(&self, entry: TraceEntry) {
        self.update(|s| s.execution_trace.push(entry));
    }

    fn step_reflected(&self, reflection: &Reflection) {
        self.update(|s| {
            if let Some(last) = s.execution_trace.last_mut() {
                last.reflection = Some(reflection.clone());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inquest_test_utils::fixtures::{plan, search_step, test_config};
    use inquest_test_utils::{ScriptedReasoner, TempDataset};
    use tracing_test::traced_test;

    fn registry(reasoner: ScriptedReasoner) -> RunRegistry {
        let orchestrator =
            crate::build_orchestrator(Arc::new(reasoner), Arc::new(test_config()));
        RunRegistry::new(Arc::new(orchestrator), Arc::new(CorpusCache::new()))
    }

    #[test]
    fn snapshot_omits_absent_result_and_error() {
        let now = Utc::now();
        let snapshot = RunSnapshot {
            run_id: "r".into(),
            query: "q".into(),
            status: RunStatus::Queued,
            progress: Progress::queued(),
            execution_trace: vec![],
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["status"], "queued");
        assert!(json.get("result").is_none());
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn default_data_path_comes_from_config() {
        let registry = registry(ScriptedReasoner::new());
        assert_eq!(registry.default_data_path(), "data/papers.json");
    }

    #[traced_test]
    #[tokio::test]
    async fn lifecycle_is_logged() {
        let dataset = TempDataset::new();
        let registry = registry(ScriptedReasoner::with_plan(plan(vec![search_step("s1", "citation")])));
        let (run_id, _) = registry
            .run_sync(RunRequest::new("q").with_data_path(dataset.path_string()))
            .await
            .unwrap();
        assert!(logs_contain("run queued"));
        assert!(logs_contain("run completed"));
        assert!(logs_contain(&run_id));
    }
}
