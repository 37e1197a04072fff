// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end contract handling of the chat reasoner against a mock service.

use inquest_config::model::{ReasonerConfig, ReasonerProvider};
use inquest_core::{
    Capabilities, MemorySnapshot, PlanRequest, Reasoner, ReflectRequest, Section, Step,
    SummarizeRequest,
};
use inquest_reasoner::{ChatReasoner, build_reasoner};
use serial_test::serial;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(uri: &str) -> ReasonerConfig {
    ReasonerConfig {
        api_key: Some("k".into()),
        base_url: uri.to_string(),
        max_retries: 0,
        ..ReasonerConfig::default()
    }
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

fn plan_request() -> PlanRequest {
    PlanRequest {
        query: "citation hallucination".into(),
        capabilities: Capabilities {
            tools: vec![],
            sections: Section::ALL.to_vec(),
        },
        memory: MemorySnapshot::default(),
    }
}

#[tokio::test]
async fn plan_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(
            r#"{"objective":"o","steps":[{"sub_question":"a","tool":"hybrid_search"},{"sub_question":"b","tool":"timeline","tool_args":{"k":3}}]}"#,
        ))
        .mount(&server)
        .await;

    let reasoner = ChatReasoner::from_config(&config(&server.uri())).unwrap();
    let plan = reasoner.plan(&plan_request()).await.unwrap();
    assert_eq!(plan.len(), 2);
    assert!(plan.steps[0].tool_args.is_object());
}

#[tokio::test]
async fn malformed_plan_is_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(r#"{"steps":[{"sub_question":"a"}]}"#))
        .mount(&server)
        .await;

    let reasoner = ChatReasoner::from_config(&config(&server.uri())).unwrap();
    let err = reasoner.plan(&plan_request()).await.unwrap_err();
    assert_eq!(err.kind(), "reasoner_contract");
}

#[tokio::test]
async fn reflection_and_synthesis_parse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(
            r#"{"replan":true,"reason":"narrow","new_steps":[{"sub_question":"more","tool":"hybrid_search","tool_args":{}}]}"#,
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(completion(r#"{"answer":"yes","evidence_points":["p1"],"risks":[],"citations":["p1"]}"#))
        .mount(&server)
        .await;

    let reasoner = ChatReasoner::from_config(&config(&server.uri())).unwrap();
    let reflection = reasoner
        .reflect(&ReflectRequest {
            query: "q".into(),
            step_index: 0,
            step: Step::new("q", "hybrid_search", serde_json::json!({})),
            observation: inquest_core::ObservationSummary::failed("hybrid_search", "x"),
            memory: MemorySnapshot::default(),
        })
        .await
        .unwrap();
    assert!(reflection.wants_insertion());

    let synthesis = reasoner
        .summarize(&SummarizeRequest {
            query: "q".into(),
            memory: MemorySnapshot::default(),
            evidence: vec![],
        })
        .await
        .unwrap();
    assert_eq!(synthesis.citations, vec!["p1"]);
}

#[test]
#[serial]
fn missing_api_key_is_config_error() {
    // SAFETY: serialized with other env-mutating tests.
    unsafe { std::env::remove_var("GROK_API_KEY") };
    let cfg = ReasonerConfig {
        api_key: None,
        ..ReasonerConfig::default()
    };
    let err = build_reasoner(&cfg).err().unwrap();
    assert_eq!(err.kind(), "config");
}

#[test]
#[serial]
fn legacy_env_key_is_accepted() {
    // SAFETY: serialized with other env-mutating tests.
    unsafe { std::env::set_var("GROK_API_KEY", "legacy") };
    let cfg = ReasonerConfig {
        api_key: None,
        ..ReasonerConfig::default()
    };
    let reasoner = build_reasoner(&cfg).unwrap();
    assert_eq!(reasoner.name(), "openai-compatible");
    unsafe { std::env::remove_var("GROK_API_KEY") };
}

#[test]
fn heuristic_needs_no_key() {
    let cfg = ReasonerConfig {
        provider: ReasonerProvider::Heuristic,
        api_key: None,
        ..ReasonerConfig::default()
    };
    assert_eq!(build_reasoner(&cfg).unwrap().name(), "heuristic");
}
