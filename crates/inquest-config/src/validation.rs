// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: weight ranges, window
//! sizes that must nest, and non-empty endpoints.

use crate::diagnostic::ConfigError;
use crate::model::{InquestConfig, ReasonerProvider};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected error (does not fail fast).
pub fn validate_config(config: &InquestConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    // Reasoner endpoint only matters when the remote provider is selected.
    let reasoner = &config.reasoner;
    if reasoner.provider == ReasonerProvider::OpenaiCompatible {
        let url = reasoner.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::validation(format!(
                "reasoner.base_url `{url}` must be an http(s) URL"
            )));
        }
        if reasoner.model.trim().is_empty() {
            errors.push(ConfigError::validation("reasoner.model must not be empty"));
        }
        if reasoner.timeout_secs == 0 {
            errors.push(ConfigError::validation(
                "reasoner.timeout_secs must be at least 1",
            ));
        }
    }
    if !(0.0..=2.0).contains(&reasoner.temperature) {
        errors.push(ConfigError::validation(format!(
            "reasoner.temperature must be within [0, 2], got {}",
            reasoner.temperature
        )));
    }

    let retrieval = &config.retrieval;
    if !(0.0..=1.0).contains(&retrieval.alpha) {
        errors.push(ConfigError::validation(format!(
            "retrieval.alpha must be within [0, 1], got {}",
            retrieval.alpha
        )));
    }
    if retrieval.top_k == 0 {
        errors.push(ConfigError::validation("retrieval.top_k must be at least 1"));
    }
    if retrieval.score_precision > 12 {
        errors.push(ConfigError::validation(format!(
            "retrieval.score_precision must be at most 12, got {}",
            retrieval.score_precision
        )));
    }

    let memory = &config.memory;
    if memory.max_entries == 0 {
        errors.push(ConfigError::validation("memory.max_entries must be at least 1"));
    }
    if memory.keep_recent == 0 || memory.keep_recent > memory.max_entries {
        errors.push(ConfigError::validation(format!(
            "memory.keep_recent must be between 1 and memory.max_entries ({}), got {}",
            memory.max_entries, memory.keep_recent
        )));
    }
    if memory.max_bytes < 1024 {
        errors.push(ConfigError::validation(format!(
            "memory.max_bytes must be at least 1024, got {}",
            memory.max_bytes
        )));
    }

    let orchestrator = &config.orchestrator;
    if orchestrator.max_steps == 0 {
        errors.push(ConfigError::validation(
            "orchestrator.max_steps must be at least 1",
        ));
    }
    if orchestrator.replan_budget > orchestrator.max_steps {
        errors.push(ConfigError::validation(format!(
            "orchestrator.replan_budget ({}) must not exceed orchestrator.max_steps ({})",
            orchestrator.replan_budget, orchestrator.max_steps
        )));
    }
    if orchestrator.max_concurrent_runs == 0 {
        errors.push(ConfigError::validation(
            "orchestrator.max_concurrent_runs must be at least 1",
        ));
    }

    let gateway = &config.gateway;
    let host = gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        )));
    }
    if let Some(token) = &gateway.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "gateway.bearer_token must not be blank when set",
        ));
    }
    if gateway.default_data_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "gateway.default_data_path must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
