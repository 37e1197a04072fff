// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sparse TF-IDF embeddings and term sets, computed once per chunk.

use std::collections::HashMap;

use crate::tokenize::tokenize;

/// A sparse vector: `(term id, weight)` pairs sorted by term id.
pub(crate) type SparseVector = Vec<(u32, f64)>;

/// Per-chunk retrieval features for one corpus.
#[derive(Debug, Default)]
pub(crate) struct SearchIndex {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f64>,
    /// Sorted, de-duplicated term ids per chunk.
    terms: Vec<Vec<u32>>,
    /// L2-normalized TF-IDF vector per chunk.
    vectors: Vec<SparseVector>,
}

/// Tokenized query, ready to score against an index.
#[derive(Debug)]
pub(crate) struct QueryFeatures {
    /// Distinct query terms known to the index.
    known_terms: Vec<u32>,
    /// Number of distinct query terms, known or not.
    distinct_terms: usize,
    vector: SparseVector,
}

impl QueryFeatures {
    pub(crate) fn is_empty(&self) -> bool {
        self.distinct_terms == 0
    }
}

impl SearchIndex {
    /// Builds the index from one text per chunk, in chunk order.
    pub(crate) fn build<I>(texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut vocabulary: HashMap<String, u32> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        let mut chunk_counts: Vec<HashMap<u32, usize>> = Vec::new();
        let mut chunk_lengths: Vec<usize> = Vec::new();

        for text in texts {
            let tokens = tokenize(&text);
            let mut counts: HashMap<u32, usize> = HashMap::new();
            for token in &tokens {
                let next_id = vocabulary.len() as u32;
                let id = *vocabulary.entry(token.clone()).or_insert(next_id);
                if id as usize == doc_freq.len() {
                    doc_freq.push(0);
                }
                *counts.entry(id).or_insert(0) += 1;
            }
            for id in counts.keys() {
                doc_freq[*id as usize] += 1;
            }
            chunk_lengths.push(tokens.len());
            chunk_counts.push(counts);
        }

        let total = chunk_counts.len().max(1) as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + total) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut terms = Vec::with_capacity(chunk_counts.len());
        let mut vectors = Vec::with_capacity(chunk_counts.len());
        for (counts, length) in chunk_counts.into_iter().zip(chunk_lengths) {
            let mut ids: Vec<u32> = counts.keys().copied().collect();
            ids.sort_unstable();
            let vector = normalize(
                counts
                    .iter()
                    .map(|(&id, &count)| (id, tf(count, length) * idf[id as usize]))
                    .collect(),
            );
            terms.push(ids);
            vectors.push(vector);
        }

        Self {
            vocabulary,
            idf,
            terms,
            vectors,
        }
    }

    pub(crate) fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Tokenizes and weights a query against this index's vocabulary.
    ///
    /// Terms outside the vocabulary get idf 1.0: they dilute the query vector
    /// and count against keyword overlap, but never match a chunk.
    pub(crate) fn query(&self, text: &str) -> QueryFeatures {
        let tokens = tokenize(text);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut known_terms = Vec::new();
        let mut known_weights = Vec::new();
        let mut unknown_norm_sq = 0.0;
        for (token, count) in &counts {
            let weight_tf = tf(*count, tokens.len());
            match self.vocabulary.get(*token) {
                Some(&id) => {
                    known_terms.push(id);
                    known_weights.push((id, weight_tf * self.idf[id as usize]));
                }
                None => unknown_norm_sq += weight_tf * weight_tf,
            }
        }
        known_terms.sort_unstable();

        let norm = (known_weights.iter().map(|(_, w)| w * w).sum::<f64>() + unknown_norm_sq).sqrt();
        let mut vector: SparseVector = if norm > 0.0 {
            known_weights
                .into_iter()
                .map(|(id, w)| (id, w / norm))
                .collect()
        } else {
            Vec::new()
        };
        vector.sort_unstable_by_key(|(id, _)| *id);

        QueryFeatures {
            known_terms,
            distinct_terms: counts.len(),
            vector,
        }
    }

    /// Cosine similarity between the query and chunk `chunk`.
    pub(crate) fn semantic(&self, query: &QueryFeatures, chunk: usize) -> f64 {
        dot(&query.vector, &self.vectors[chunk]).clamp(0.0, 1.0)
    }

    /// Fraction of distinct query terms present in chunk `chunk`.
    pub(crate) fn keyword_overlap(&self, query: &QueryFeatures, chunk: usize) -> f64 {
        if query.distinct_terms == 0 {
            return 0.0;
        }
        let chunk_terms = &self.terms[chunk];
        let matched = query
            .known_terms
            .iter()
            .filter(|id| chunk_terms.binary_search(id).is_ok())
            .count();
        matched as f64 / query.distinct_terms as f64
    }
}

fn tf(count: usize, length: usize) -> f64 {
    count as f64 / length.max(1) as f64
}

fn normalize(mut vector: SparseVector) -> SparseVector {
    vector.sort_unstable_by_key(|(id, _)| *id);
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut vector {
            *w /= norm;
        }
    }
    vector
}

/// Dot product of two id-sorted sparse vectors.
fn dot(a: &[(u32, f64)], b: &[(u32, f64)]) -> f64 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
