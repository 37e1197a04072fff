// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Inquest research orchestrator.
//!
//! This crate provides the error taxonomy, the plan / observation / run data
//! model, and the [`Reasoner`] trait. Every other crate in the workspace builds
//! on these types.

pub mod error;
pub mod memory;
pub mod observation;
pub mod plan;
pub mod run;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::InquestError;
pub use memory::{EntryView, MemoryDigest, MemorySnapshot, SnapshotEntry};
pub use observation::{
    CitationGraph, GraphEdge, GraphNode, Hit, HitSummary, Observation, ObservationSummary,
    TimelineEntry,
};
pub use plan::{Ambiguity, Plan, Reflection, Step, Synthesis};
pub use run::{
    PolicyEvent, Progress, RunFailure, RunOptions, RunRequest, RunResult, RunStatus, Stage,
    TraceEntry,
};
pub use traits::{PlanRequest, Reasoner, ReflectRequest, SummarizeRequest};
pub use types::{Capabilities, CitationCount, ReasonerOperation, Section, ToolDescriptor};
