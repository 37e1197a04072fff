// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context memory: the record of what a run has learned so far.
//!
//! Entries are append-only. Compression never drops an entry; it moves a
//! watermark so that older entries are rendered with reduced detail. The
//! citation index is updated only by [`ContextMemory::record`].

use std::collections::{BTreeMap, HashSet};

use inquest_config::model::MemoryConfig;
use inquest_core::{
    CitationCount, EntryView, MemoryDigest, MemorySnapshot, ObservationSummary, Reflection,
    SnapshotEntry, Step,
};
use tracing::{debug, warn};

/// One executed step as stored in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub step_index: usize,
    pub step: Step,
    pub observation: ObservationSummary,
    pub reflection: Option<Reflection>,
}

/// Per-run context memory.
#[derive(Debug, Clone)]
pub struct ContextMemory {
    max_entries: usize,
    max_bytes: usize,
    keep_recent: usize,
    reason_chars: usize,
    entries: Vec<MemoryEntry>,
    /// Entries below this index are rendered compressed.
    watermark: usize,
    citation_index: BTreeMap<String, usize>,
    compressions: usize,
}

impl ContextMemory {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            max_entries: config.max_entries.max(1),
            max_bytes: config.max_bytes,
            keep_recent: config.keep_recent.max(1),
            reason_chars: config.reason_chars,
            entries: Vec::new(),
            watermark: 0,
            citation_index: BTreeMap::new(),
            compressions: 0,
        }
    }

    /// Appends a step and counts each of `citations` in the citation index.
    pub fn record(
        &mut self,
        step_index: usize,
        step: &Step,
        observation: ObservationSummary,
        citations: &[String],
    ) {
        for paper_id in citations {
            *self.citation_index.entry(paper_id.clone()).or_insert(0) += 1;
        }
        self.entries.push(MemoryEntry {
            step_index,
            step: step.clone(),
            observation,
            reflection: None,
        });
        self.compress_if_needed();
    }

    /// Binds a reflection to the newest entry. No-op on empty memory.
    pub fn attach_reflection(&mut self, reflection: &Reflection) {
        if let Some(last) = self.entries.last_mut() {
            last.reflection = Some(reflection.clone());
            self.compress_if_needed();
        }
    }

    /// True when the entry count or serialized size exceeds its limit.
    pub fn needs_compression(&self) -> bool {
        self.entries.len() > self.max_entries || self.serialized_len() > self.max_bytes
    }

    /// Compresses every entry except the newest `keep_recent`.
    ///
    /// Returns `true` if the watermark moved.
    pub fn compress(&mut self) -> bool {
        let target = self.entries.len().saturating_sub(self.keep_recent);
        if target <= self.watermark {
            return false;
        }
        let before = self.serialized_len();
        self.watermark = target;
        self.compressions += 1;
        debug!(
            compressed = self.watermark,
            entries = self.entries.len(),
            bytes_before = before,
            bytes_after = self.serialized_len(),
            "context memory compressed"
        );
        true
    }

    fn compress_if_needed(&mut self) {
        if !self.needs_compression() {
            return;
        }
        if !self.compress() && self.serialized_len() > self.max_bytes {
            warn!(
                bytes = self.serialized_len(),
                max_bytes = self.max_bytes,
                "context memory above byte limit with only recent entries left"
            );
        }
    }

    /// The reasoner-facing view: newest `max_entries` entries, older ones
    /// folded into a digest, and the full citation index.
    pub fn snapshot(&self) -> MemorySnapshot {
        let split = self.entries.len().saturating_sub(self.max_entries);
        let digest = (split > 0).then(|| digest_of(&self.entries[..split]));
        MemorySnapshot {
            digest,
            entries: (split..self.entries.len()).map(|i| self.view(i)).collect(),
            citation_index: self.citation_index.clone(),
            distinct_papers: self.citation_index.len(),
        }
    }

    fn view(&self, index: usize) -> SnapshotEntry {
        let entry = &self.entries[index];
        let compressed = index < self.watermark;
        let view = if compressed {
            EntryView::Compressed {
                tool: entry.observation.tool.clone(),
                hit_count: entry.observation.hit_count,
                paper_ids: entry.observation.paper_ids.clone(),
                ambiguity: entry.observation.ambiguity,
            }
        } else {
            EntryView::Full {
                observation: entry.observation.clone(),
            }
        };
        let reason = entry.reflection.as_ref().map(|r| {
            if compressed {
                truncate_chars(&r.reason, self.reason_chars)
            } else {
                r.reason.clone()
            }
        });
        SnapshotEntry {
            step_index: entry.step_index,
            sub_question: entry.step.sub_question.clone(),
            view,
            replan: entry.reflection.as_ref().map(|r| r.replan),
            reason,
        }
    }

    fn serialized_len(&self) -> usize {
        let views: Vec<SnapshotEntry> = (0..self.entries.len()).map(|i| self.view(i)).collect();
        match serde_json::to_vec(&views) {
            Ok(bytes) => bytes.len(),
            Err(err) => {
                warn!(error = %err, "memory entries failed to serialize; byte threshold skipped");
                0
            }
        }
    }

    pub fn citation_index(&self) -> &BTreeMap<String, usize> {
        &self.citation_index
    }

    pub fn distinct_papers(&self) -> usize {
        self.citation_index.len()
    }

    /// Most cited papers: count descending, then paper id ascending.
    pub fn top_citations(&self, limit: usize) -> Vec<CitationCount> {
        let mut counts: Vec<CitationCount> = self
            .citation_index
            .iter()
            .map(|(paper_id, &count)| CitationCount {
                paper_id: paper_id.clone(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.paper_id.cmp(&b.paper_id)));
        counts.truncate(limit);
        counts
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Number of entries currently rendered compressed.
    pub fn compressed_len(&self) -> usize {
        self.watermark
    }

    /// How many times the watermark has advanced.
    pub fn compressions(&self) -> usize {
        self.compressions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn digest_of(entries: &[MemoryEntry]) -> MemoryDigest {
    let mut tools_seen = HashSet::new();
    let mut papers_seen = HashSet::new();
    let mut digest = MemoryDigest {
        steps: entries.len(),
        ..MemoryDigest::default()
    };
    for entry in entries {
        if tools_seen.insert(entry.observation.tool.as_str()) {
            digest.tools.push(entry.observation.tool.clone());
        }
        for id in &entry.observation.paper_ids {
            if papers_seen.insert(id.as_str()) {
                digest.paper_ids.push(id.clone());
            }
        }
    }
    digest
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
