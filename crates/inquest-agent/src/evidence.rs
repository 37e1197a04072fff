// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evidence pooled across the steps of one run.

use std::collections::HashMap;

use inquest_core::Hit;
use inquest_corpus::rank_order;

/// Best hit per chunk, across every retrieval in a run.
#[derive(Debug, Default)]
pub struct EvidencePool {
    best: HashMap<String, Hit>,
}

impl EvidencePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds hits, keeping the higher-scoring copy of a chunk seen twice.
    pub fn extend<'a>(&mut self, hits: impl IntoIterator<Item = &'a Hit>) {
        for hit in hits {
            match self.best.get(&hit.chunk_id) {
                Some(existing) if existing.hybrid_score >= hit.hybrid_score => {}
                _ => {
                    self.best.insert(hit.chunk_id.clone(), hit.clone());
                }
            }
        }
    }

    /// Top `limit` hits in ranking order.
    pub fn top(&self, limit: usize) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self.best.values().cloned().collect();
        hits.sort_by(rank_order);
        hits.truncate(limit);
        hits
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
