// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inquest run`: one synchronous run printed to stdout.

use std::fmt::Write as _;

use inquest_agent::install_signal_handler;
use inquest_config::InquestConfig;
use inquest_core::{InquestError, PolicyEvent, RunOptions, RunRequest, RunResult};
use tracing::info;

use crate::RunArgs;
use crate::serve::build_registry;

pub async fn run_query(config: InquestConfig, args: RunArgs) -> Result<(), InquestError> {
    let data_path = args
        .data
        .unwrap_or_else(|| config.gateway.default_data_path.clone());
    let request = RunRequest::new(args.query)
        .with_data_path(data_path)
        .with_options(RunOptions {
            full_trace: args.full_trace,
            ..RunOptions::default()
        });

    let (registry, reasoner_name) = build_registry(config)?;
    let shutdown = install_signal_handler();

    let run = registry.run_sync(request);
    tokio::pin!(run);
    let (run_id, result) = tokio::select! {
        outcome = &mut run => outcome?,
        _ = shutdown.cancelled() => {
            registry.cancel_all();
            run.await?
        }
    };
    info!(run_id = %run_id, "run finished");

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| InquestError::Internal(format!("failed to encode result: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", render_summary(&reasoner_name, &result));
    }
    Ok(())
}

/// Human-readable rendering of a result.
pub fn render_summary(reasoner: &str, result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Reasoner: {reasoner}");
    let _ = writeln!(
        out,
        "Steps: {} executed, {} replanned",
        result.steps_executed, result.replans_used
    );
    for event in &result.policy_events {
        let _ = match event {
            PolicyEvent::ReplanBudgetExceeded { budget, step_index } => writeln!(
                out,
                "Note: replan budget of {budget} exhausted at step {step_index}"
            ),
            PolicyEvent::MaxStepsReached {
                max_steps,
                pending_steps,
            } => writeln!(
                out,
                "Note: stopped after {max_steps} steps with {pending_steps} pending"
            ),
        };
    }

    let synthesis = &result.synthesis;
    let _ = write!(out, "\nFinal Answer:\n{}\n", synthesis.answer);

    if !synthesis.evidence_points.is_empty() {
        out.push_str("\nEvidence:\n");
        for point in &synthesis.evidence_points {
            let _ = writeln!(out, "{point}");
        }
    }

    if !synthesis.risks.is_empty() {
        out.push_str("\nRisks:\n");
        for risk in &synthesis.risks {
            let _ = writeln!(out, "- {risk}");
        }
    }

    out.push_str("\nTop Citations:\n");
    for citation in &result.top_citations {
        let _ = writeln!(out, "- {} ({})", citation.paper_id, citation.count);
    }
    out
}
