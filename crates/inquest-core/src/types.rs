// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the corpus, tools, memory, and orchestrator crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A named section of a paper record.
///
/// Declaration order is the canonical section order and is used as the final
/// tie-break when ranking chunks of the same paper.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Abstract,
    Methodology,
    Findings,
    Limitations,
}

impl Section {
    /// All sections in canonical order.
    pub const ALL: [Section; 4] = [
        Section::Abstract,
        Section::Methodology,
        Section::Findings,
        Section::Limitations,
    ];

    /// Returns the lowercase section name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Abstract => "abstract",
            Section::Methodology => "methodology",
            Section::Findings => "findings",
            Section::Limitations => "limitations",
        }
    }
}

/// The three request kinds the external reasoner serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReasonerOperation {
    Plan,
    Reflect,
    Summarize,
}

/// Describes one tool to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's `tool_args`.
    pub parameters: serde_json::Value,
}

/// The capability description handed to the reasoner when planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub tools: Vec<ToolDescriptor>,
    pub sections: Vec<Section>,
}

impl Capabilities {
    /// Returns true if a tool with this name is advertised.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }
}

/// A paper id together with how often retrieved evidence cited it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationCount {
    pub paper_id: String,
    pub count: usize,
}
