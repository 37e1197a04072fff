// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only views of a run's context memory, as sent to the reasoner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::observation::ObservationSummary;
use crate::plan::Ambiguity;

/// Detail level of one memory entry in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum EntryView {
    /// Full compact summary including top hits.
    Full { observation: ObservationSummary },
    /// Reduced detail: counts and paper identifiers only.
    Compressed {
        tool: String,
        hit_count: usize,
        paper_ids: Vec<String>,
        ambiguity: Ambiguity,
    },
}

/// One step as remembered by the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub step_index: usize,
    pub sub_question: String,
    #[serde(flatten)]
    pub view: EntryView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replan: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregate of entries that fell outside the snapshot window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDigest {
    pub steps: usize,
    pub tools: Vec<String>,
    pub paper_ids: Vec<String>,
}

/// The memory view handed to the reasoner for reflection and synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<MemoryDigest>,
    pub entries: Vec<SnapshotEntry>,
    pub citation_index: BTreeMap<String, usize>,
    pub distinct_papers: usize,
}

impl MemorySnapshot {
    /// Number of steps the snapshot accounts for, including folded ones.
    pub fn step_count(&self) -> usize {
        self.entries.len() + self.digest.as_ref().map_or(0, |d| d.steps)
    }
}
