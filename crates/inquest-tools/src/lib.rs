// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tools the orchestrator invokes for plan steps.

pub mod citation_graph;
pub mod hybrid_search;
pub mod timeline;
pub mod tool;

#[cfg(test)]
pub(crate) mod test_support;

pub use citation_graph::{BOTH, CitationGraphTool, INCOMING, OUTGOING, traverse};
pub use hybrid_search::HybridSearchTool;
pub use timeline::TimelineTool;
pub use tool::{Tool, ToolContext, ToolRegistry};
