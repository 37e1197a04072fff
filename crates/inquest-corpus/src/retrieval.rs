// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retriever blending TF-IDF cosine similarity with keyword overlap.
//!
//! `hybrid = alpha * semantic + (1 - alpha) * keyword`. Chunks with a zero
//! hybrid score are not candidates. Ranking is by the rounded hybrid score,
//! then year (newest first), then paper id, then canonical section order, so
//! equal scores always produce the same order.

use std::cmp::Ordering;
use std::sync::Arc;

use inquest_core::{Hit, Section};
use tracing::debug;

use crate::dataset::Corpus;
use crate::error::CorpusError;

/// Query-time view over a shared [`Corpus`].
#[derive(Debug, Clone)]
pub struct HybridRetriever {
    corpus: Arc<Corpus>,
    alpha: f64,
    precision: u32,
}

impl HybridRetriever {
    /// Creates a retriever. `alpha` is clamped to `[0, 1]`.
    pub fn new(corpus: Arc<Corpus>, alpha: f64, precision: u32) -> Self {
        Self {
            corpus,
            alpha: alpha.clamp(0.0, 1.0),
            precision,
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Returns the top `k` chunks for `query` restricted to `sections`.
    ///
    /// An empty `sections` slice searches every section. Fails with
    /// [`CorpusError::EmptyQuery`] when the query has no indexable terms; an
    /// empty corpus yields `Ok(vec![])`.
    pub fn search(&self, query: &str, sections: &[Section], k: usize) -> Result<Vec<Hit>, CorpusError> {
        let index = self.corpus.index();
        let features = index.query(query);
        if features.is_empty() {
            return Err(CorpusError::EmptyQuery);
        }

        let mut hits: Vec<Hit> = self
            .corpus
            .chunks()
            .iter()
            .enumerate()
            .filter(|(_, chunk)| sections.is_empty() || sections.contains(&chunk.section))
            .filter_map(|(i, chunk)| {
                let semantic = index.semantic(&features, i);
                let keyword = index.keyword_overlap(&features, i);
                let hybrid = (self.alpha * semantic + (1.0 - self.alpha) * keyword).clamp(0.0, 1.0);
                if hybrid <= 0.0 {
                    return None;
                }
                let paper = self.corpus.paper_of(chunk);
                Some(Hit {
                    chunk_id: chunk.chunk_id.clone(),
                    paper_id: paper.paper_id.clone(),
                    title: paper.title.clone(),
                    year: paper.year,
                    section: chunk.section,
                    language: paper.language.clone(),
                    stance: paper.stance.clone(),
                    hybrid_score: round_to(hybrid, self.precision),
                    keyword_score: round_to(keyword, self.precision),
                    semantic_score: round_to(semantic, self.precision),
                    text: Some(paper.section(chunk.section).to_string()),
                })
            })
            .collect();

        let candidates = hits.len();
        hits.sort_by(rank_order);
        hits.truncate(k);
        debug!(query, candidates, returned = hits.len(), "hybrid search");
        Ok(hits)
    }
}

/// Total order used for ranking: score desc, year desc, paper id asc, section asc.
pub fn rank_order(a: &Hit, b: &Hit) -> Ordering {
    b.hybrid_score
        .total_cmp(&a.hybrid_score)
        .then_with(|| b.year.cmp(&a.year))
        .then_with(|| a.paper_id.cmp(&b.paper_id))
        .then_with(|| a.section.cmp(&b.section))
}

/// Rounds `value` to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}
