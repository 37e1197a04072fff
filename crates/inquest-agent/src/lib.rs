// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run orchestration for Inquest.
//!
//! The [`Orchestrator`] drives one run through planning, tool execution,
//! reflection, replanning and synthesis. The [`RunRegistry`] owns every run
//! in the process: it assigns run ids, bounds concurrency, publishes status
//! and trace for polling, and propagates cancellation.

pub mod evidence;
pub mod orchestrator;
pub mod registry;
pub mod shutdown;

use std::sync::Arc;

use inquest_config::InquestConfig;
use inquest_core::Reasoner;
use inquest_tools::ToolRegistry;
use tracing::info;

pub use evidence::EvidencePool;
pub use orchestrator::{NoopObserver, Orchestrator, RunObserver};
pub use registry::{RunHandle, RunRegistry, RunSnapshot};
pub use shutdown::{drain_runs, install_signal_handler};

/// Builds an orchestrator with the built-in research tools.
pub fn build_orchestrator(reasoner: Arc<dyn Reasoner>, config: Arc<InquestConfig>) -> Orchestrator {
    let tools = ToolRegistry::with_builtins();
    info!(
        reasoner = reasoner.name(),
        tools = tools.len(),
        "orchestrator initialized"
    );
    Orchestrator::new(reasoner, Arc::new(tools), config)
}
