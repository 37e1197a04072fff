// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dataset store and hybrid retrieval engine for Inquest.
//!
//! A [`Corpus`] is loaded once per dataset file and shared read-only between
//! runs through a [`CorpusCache`]. Section chunks are embedded (sparse TF-IDF)
//! at load time; a [`HybridRetriever`] ranks them against a query by a blend
//! of cosine similarity and keyword overlap. Citations form a
//! [`CitationNetwork`] built alongside the index.

pub mod cache;
pub mod citations;
pub mod dataset;
pub mod error;
mod index;
pub mod retrieval;
pub mod tokenize;

pub use cache::CorpusCache;
pub use citations::{CitationNetwork, CitedPaper};
pub use dataset::{Chunk, Corpus, PaperRecord};
pub use error::CorpusError;
pub use retrieval::{HybridRetriever, rank_order, round_to};
