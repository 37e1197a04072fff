// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranking properties of the hybrid retriever.

use std::sync::Arc;

use inquest_core::{Hit, Section};
use inquest_corpus::{Corpus, HybridRetriever, PaperRecord};
use proptest::prelude::*;

fn three_papers() -> Arc<Corpus> {
    let json = r#"[
        {"paper_id": "lit-01", "title": "Citation hallucination in LLM-written reviews", "year": 2024,
         "language": "en", "venue": "ACL", "authors": ["Chen"], "stance": "critical",
         "abstract": "Large language models fabricate citations when drafting literature reviews.",
         "methodology": "We audit 2,000 generated references against bibliographic databases.",
         "findings": "One in five citations is hallucinated.",
         "limitations": "English-only sample.",
         "keywords": ["citation", "hallucination"], "citations": ["lit-02"]},
        {"paper_id": "lit-02", "title": "Retrieval-grounded citation generation", "year": 2023,
         "language": "en", "venue": "EMNLP", "authors": ["Okafor"], "stance": "supportive",
         "abstract": "Grounding generation in retrieved papers reduces hallucination.",
         "findings": "Retrieval cuts fabricated citations by half.",
         "keywords": ["retrieval", "grounding"], "citations": ["lit-01"]},
        {"paper_id": "lit-03", "title": "Graph neural networks for molecules", "year": 2022,
         "language": "en", "venue": "NeurIPS", "authors": ["Ivanova"],
         "abstract": "Message passing over molecular graphs.",
         "keywords": ["chemistry"]}
    ]"#;
    Arc::new(Corpus::from_json_str(json).unwrap())
}

fn assert_ranked(hits: &[Hit]) {
    for pair in hits.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.hybrid_score >= b.hybrid_score, "{a:?} before {b:?}");
        if a.hybrid_score == b.hybrid_score {
            assert!(
                a.year > b.year || (a.year == b.year && a.paper_id <= b.paper_id),
                "tie-break violated: {a:?} before {b:?}"
            );
        }
    }
}

#[test]
fn three_paper_scenario_returns_k_ranked_hits() {
    let retriever = HybridRetriever::new(three_papers(), 0.55, 4);
    let hits = retriever
        .search("citation hallucination", &Section::ALL, 2)
        .unwrap();

    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert!((0.0..=1.0).contains(&hit.hybrid_score));
    }
    assert!(hits[0].hybrid_score >= hits[1].hybrid_score);
    assert_eq!(hits[0].paper_id, "lit-01");
}

#[test]
fn k_beyond_candidates_returns_all_without_padding() {
    let retriever = HybridRetriever::new(three_papers(), 0.55, 4);
    let all = retriever.search("citation", &[], 1000).unwrap();
    assert!(all.len() <= 12);
    let mut ids: Vec<&str> = all.iter().map(|h| h.chunk_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), all.len());
}

#[test]
fn repeated_searches_are_identical() {
    let retriever = HybridRetriever::new(three_papers(), 0.55, 4);
    let a = retriever.search("retrieval grounded citations", &[], 6).unwrap();
    let b = retriever.search("retrieval grounded citations", &[], 6).unwrap();
    assert_eq!(a, b);
}

fn arb_paper(id: usize) -> impl Strategy<Value = PaperRecord> {
    let words = prop::sample::select(vec![
        "citation", "hallucination", "retrieval", "graph", "review", "bias", "audit", "model",
    ]);
    (
        2015i32..2026,
        prop::collection::vec(words.clone(), 1..8),
        prop::collection::vec(words, 1..4),
    )
        .prop_map(move |(year, body, title)| PaperRecord {
            paper_id: format!("p{id:02}"),
            title: title.join(" "),
            year,
            language: "en".into(),
            venue: String::new(),
            authors: vec![],
            keywords: vec![],
            stance: "mixed".into(),
            sections: [(Section::Abstract, body.join(" "))].into_iter().collect(),
            citations: vec![],
        })
}

fn arb_corpus() -> impl Strategy<Value = Vec<PaperRecord>> {
    (1usize..8).prop_flat_map(|n| (0..n).map(arb_paper).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn results_are_sorted_with_deterministic_tie_break(
        papers in arb_corpus(),
        query in prop::sample::select(vec!["citation", "graph review", "bias audit model", "hallucination retrieval"]),
        k in 1usize..20,
        alpha in 0.0f64..=1.0,
    ) {
        let corpus = Arc::new(Corpus::from_papers(papers).unwrap());
        let hits = HybridRetriever::new(corpus, alpha, 4).search(query, &[], k).unwrap();
        prop_assert!(hits.len() <= k);
        for hit in &hits {
            prop_assert!((0.0..=1.0).contains(&hit.hybrid_score));
        }
        assert_ranked(&hits);
    }
}
