// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable in-memory collection of paper records and their section chunks.
//!
//! A dataset file is a JSON array of paper objects. Section text may be given
//! either as a `sections` map or as flat `abstract` / `methodology` /
//! `findings` / `limitations` fields; flat fields win when both are present.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use inquest_core::{InquestError, Section};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::citations::CitationNetwork;
use crate::error::CorpusError;
use crate::index::SearchIndex;

/// One paper as stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperRecord {
    pub paper_id: String,
    pub title: String,
    pub year: i32,
    pub language: String,
    pub venue: String,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
    /// Position the paper takes on its topic (`supportive`, `critical`, `mixed`, ...).
    pub stance: String,
    pub sections: BTreeMap<Section, String>,
    /// Ids this paper cites. May name papers outside the dataset.
    pub citations: Vec<String>,
}

impl PaperRecord {
    /// Text of a section, empty when the record has none.
    pub fn section(&self, section: Section) -> &str {
        self.sections.get(&section).map(String::as_str).unwrap_or("")
    }
}

fn default_stance() -> String {
    "mixed".to_string()
}

#[derive(Debug, Deserialize)]
struct RawPaper {
    paper_id: String,
    title: String,
    year: i32,
    #[serde(default)]
    language: String,
    #[serde(default)]
    venue: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default = "default_stance")]
    stance: String,
    #[serde(default)]
    sections: BTreeMap<Section, String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    methodology: Option<String>,
    #[serde(default)]
    findings: Option<String>,
    #[serde(default)]
    limitations: Option<String>,
    #[serde(default)]
    citations: Vec<String>,
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

impl From<RawPaper> for PaperRecord {
    fn from(raw: RawPaper) -> Self {
        let mut sections = raw.sections;
        for (section, text) in [
            (Section::Abstract, raw.abstract_text),
            (Section::Methodology, raw.methodology),
            (Section::Findings, raw.findings),
            (Section::Limitations, raw.limitations),
        ] {
            if let Some(text) = text {
                sections.insert(section, text);
            }
        }
        Self {
            paper_id: raw.paper_id.trim().to_string(),
            title: raw.title,
            year: raw.year,
            language: raw.language,
            venue: raw.venue,
            authors: raw.authors,
            keywords: dedup(raw.keywords),
            stance: raw.stance,
            sections,
            citations: dedup(raw.citations),
        }
    }
}

/// One (paper, section) unit of retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// `"{paper_id}:{section}"`.
    pub chunk_id: String,
    /// Index of the owning paper in [`Corpus::papers`].
    pub paper: usize,
    pub section: Section,
}

/// The loaded dataset plus everything derived from it at load time.
#[derive(Debug)]
pub struct Corpus {
    papers: Vec<PaperRecord>,
    by_id: HashMap<String, usize>,
    citations: CitationNetwork,
    chunks: Vec<Chunk>,
    index: SearchIndex,
}

impl Corpus {
    /// Builds a corpus from records, rejecting empty or duplicate ids.
    pub fn from_papers(papers: Vec<PaperRecord>) -> Result<Self, CorpusError> {
        let mut by_id = HashMap::with_capacity(papers.len());
        for (position, paper) in papers.iter().enumerate() {
            if paper.paper_id.is_empty() {
                return Err(CorpusError::EmptyPaperId { position });
            }
            if by_id.insert(paper.paper_id.clone(), position).is_some() {
                return Err(CorpusError::DuplicatePaper(paper.paper_id.clone()));
            }
        }

        let citations = CitationNetwork::build(&papers);

        let chunks: Vec<Chunk> = papers
            .iter()
            .enumerate()
            .flat_map(|(i, paper)| {
                Section::ALL.into_iter().map(move |section| Chunk {
                    chunk_id: format!("{}:{}", paper.paper_id, section),
                    paper: i,
                    section,
                })
            })
            .collect();

        let index = SearchIndex::build(chunks.iter().map(|chunk| {
            let paper = &papers[chunk.paper];
            format!(
                "{} {} {}",
                paper.title,
                paper.section(chunk.section),
                paper.keywords.join(" ")
            )
        }));
        debug!(
            papers = papers.len(),
            chunks = chunks.len(),
            citation_edges = citations.edge_count(),
            vocabulary = index.vocabulary_len(),
            "corpus index built"
        );

        Ok(Self {
            papers,
            by_id,
            citations,
            chunks,
            index,
        })
    }

    /// Parses a JSON array of paper objects.
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let raw: Vec<RawPaper> = serde_json::from_str(json)?;
        Self::from_papers(raw.into_iter().map(PaperRecord::from).collect())
    }

    /// Reads and indexes a dataset file. Blocking; call from a blocking context.
    pub fn load(path: &Path) -> Result<Self, InquestError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CorpusError::Io(e).into_dataset_error(path))?;
        let corpus = Self::from_json_str(&content).map_err(|e| e.into_dataset_error(path))?;
        info!(
            path = %path.display(),
            papers = corpus.len(),
            "dataset loaded"
        );
        Ok(corpus)
    }

    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn get(&self, paper_id: &str) -> Option<&PaperRecord> {
        self.by_id.get(paper_id).map(|&i| &self.papers[i])
    }

    pub fn contains(&self, paper_id: &str) -> bool {
        self.by_id.contains_key(paper_id)
    }

    /// The citation network, including dangling cited ids.
    pub fn citations(&self) -> &CitationNetwork {
        &self.citations
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub(crate) fn paper_of(&self, chunk: &Chunk) -> &PaperRecord {
        &self.papers[chunk.paper]
    }

    pub(crate) fn index(&self) -> &SearchIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = r#"[
        {"paper_id": "p1", "title": "Grounded citations", "year": 2023,
         "language": "en", "venue": "ACL", "authors": ["A"],
         "abstract": "We study citation hallucination.",
         "methodology": "Audit.", "findings": "Errors drop.", "limitations": "Small.",
         "citations": ["p2", "p2", "ghost"], "keywords": ["citation", "citation"],
         "stance": "supportive"},
        {"paper_id": "p2", "title": "Older work", "year": 2020,
         "sections": {"abstract": "Baseline retrieval."}, "citations": ["p1"]}
    ]"#;

    #[test]
    fn loads_flat_and_nested_section_layouts() {
        let corpus = Corpus::from_json_str(FLAT).unwrap();
        assert_eq!(corpus.len(), 2);
        let p1 = corpus.get("p1").unwrap();
        assert_eq!(p1.section(Section::Findings), "Errors drop.");
        assert_eq!(p1.citations, vec!["p2", "ghost"]);
        assert_eq!(p1.keywords, vec!["citation"]);

        let p2 = corpus.get("p2").unwrap();
        assert_eq!(p2.section(Section::Abstract), "Baseline retrieval.");
        assert_eq!(p2.section(Section::Limitations), "");
        assert_eq!(p2.stance, "mixed");
    }

    #[test]
    fn every_paper_yields_one_chunk_per_section() {
        let corpus = Corpus::from_json_str(FLAT).unwrap();
        assert_eq!(corpus.chunks().len(), 8);
        assert_eq!(corpus.chunks()[0].chunk_id, "p1:abstract");
        assert_eq!(corpus.chunks()[7].chunk_id, "p2:limitations");
    }

    #[test]
    fn reverse_citations_are_indexed() {
        let corpus = Corpus::from_json_str(FLAT).unwrap();
        let network = corpus.citations();
        assert_eq!(network.cited_by("p2"), vec!["p1"]);
        assert_eq!(network.cited_by("p1"), vec!["p2"]);
        assert!(network.node("ghost").is_some_and(|n| network.paper(n).dangling));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[{"paper_id":"x","title":"a","year":1},{"paper_id":"x","title":"b","year":2}]"#;
        assert!(matches!(
            Corpus::from_json_str(json),
            Err(CorpusError::DuplicatePaper(id)) if id == "x"
        ));
    }

    #[test]
    fn blank_id_is_rejected() {
        let json = r#"[{"paper_id":"  ","title":"a","year":1}]"#;
        assert!(matches!(
            Corpus::from_json_str(json),
            Err(CorpusError::EmptyPaperId { position: 0 })
        ));
    }

    #[test]
    fn empty_dataset_is_valid() {
        let corpus = Corpus::from_json_str("[]").unwrap();
        assert!(corpus.is_empty());
        assert!(corpus.chunks().is_empty());
    }

    #[test]
    fn missing_file_is_dataset_error() {
        let err = Corpus::load(Path::new("/nonexistent/papers.json")).unwrap_err();
        assert!(matches!(err, InquestError::Dataset { .. }));
    }

    #[test]
    fn malformed_json_is_dataset_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Corpus::load(&path).unwrap_err();
        assert_eq!(err.kind(), "dataset");
    }
}
