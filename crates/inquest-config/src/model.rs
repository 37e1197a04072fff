// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Inquest research orchestrator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Inquest configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InquestConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// External reasoner settings.
    #[serde(default)]
    pub reasoner: ReasonerConfig,

    /// Hybrid retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Context memory compression settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Run orchestration policy.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and the health endpoint.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "inquest".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which reasoner implementation serves plan / reflect / summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonerProvider {
    /// Any chat-completions endpoint speaking the OpenAI wire format (xAI by default).
    #[default]
    OpenaiCompatible,
    /// Deterministic offline reasoner. Must be selected explicitly.
    Heuristic,
}

/// External reasoner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReasonerConfig {
    #[serde(default)]
    pub provider: ReasonerProvider,

    /// API key. `None` falls back to `INQUEST_REASONER_API_KEY`, then `GROK_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Full chat-completions endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on 429 / 500 / 503 responses.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            provider: ReasonerProvider::default(),
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.x.ai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "grok-4-1-fast-reasoning".to_string()
}

fn default_timeout_secs() -> u64 {
    40
}

fn default_max_retries() -> u32 {
    1
}

fn default_temperature() -> f32 {
    0.1
}

/// Hybrid retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Weight of semantic similarity in the hybrid score; keyword overlap gets `1 - alpha`.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Default number of hits per search.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Decimal places kept on reported scores.
    #[serde(default = "default_score_precision")]
    pub score_precision: u32,

    /// Hits kept per compact observation summary.
    #[serde(default = "default_top_hits")]
    pub top_hits: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            top_k: default_top_k(),
            score_precision: default_score_precision(),
            top_hits: default_top_hits(),
        }
    }
}

fn default_alpha() -> f64 {
    0.55
}

fn default_top_k() -> usize {
    6
}

fn default_score_precision() -> u32 {
    4
}

fn default_top_hits() -> usize {
    3
}

/// Context memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Entry count above which compression runs, and the snapshot window size.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Serialized view size (bytes) above which compression runs.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Newest entries that keep full detail through compression.
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,

    /// Reflection reasons of compressed entries are cut to this many characters.
    #[serde(default = "default_reason_chars")]
    pub reason_chars: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_bytes: default_max_bytes(),
            keep_recent: default_keep_recent(),
            reason_chars: default_reason_chars(),
        }
    }
}

fn default_max_entries() -> usize {
    12
}

fn default_max_bytes() -> usize {
    32 * 1024
}

fn default_keep_recent() -> usize {
    4
}

fn default_reason_chars() -> usize {
    160
}

/// Run orchestration policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Maximum replans per run.
    #[serde(default = "default_replan_budget")]
    pub replan_budget: usize,

    /// Maximum steps executed per run.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Runs allowed to execute at once; the rest wait in `queued`.
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: usize,

    /// Pooled evidence items passed to the synthesis.
    #[serde(default = "default_evidence_limit")]
    pub evidence_limit: usize,

    /// Top cited papers reported in the result.
    #[serde(default = "default_citation_limit")]
    pub citation_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            replan_budget: default_replan_budget(),
            max_steps: default_max_steps(),
            max_concurrent_runs: default_max_concurrent_runs(),
            evidence_limit: default_evidence_limit(),
            citation_limit: default_citation_limit(),
        }
    }
}

fn default_replan_budget() -> usize {
    2
}

fn default_max_steps() -> usize {
    8
}

fn default_max_concurrent_runs() -> usize {
    4
}

fn default_evidence_limit() -> usize {
    8
}

fn default_citation_limit() -> usize {
    8
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on `/v1/*`. `None` leaves the API open.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Dataset used when a request omits `data_path`.
    #[serde(default = "default_data_path")]
    pub default_data_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
            default_data_path: default_data_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_data_path() -> String {
    "data/papers.json".to_string()
}
