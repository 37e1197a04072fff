// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Reasoner`] backed by an OpenAI-compatible chat-completions service.

use std::time::Duration;

use async_trait::async_trait;
use inquest_config::model::ReasonerConfig;
use inquest_core::{
    InquestError, Plan, PlanRequest, ReasonerOperation, Reasoner, ReflectRequest, Reflection,
    SummarizeRequest, Synthesis,
};
use tracing::debug;

use crate::client::ChatClient;
use crate::parse::{parse_plan, parse_reflection, parse_synthesis};
use crate::prompt::{plan_messages, reflect_messages, summarize_messages};

/// Fallback variable for the API key when neither config nor
/// `INQUEST_REASONER_API_KEY` provide one.
pub const LEGACY_API_KEY_ENV: &str = "GROK_API_KEY";

/// Added to the configured temperature for planning calls.
const PLAN_TEMPERATURE_BOOST: f32 = 0.1;

pub struct ChatReasoner {
    client: ChatClient,
    temperature: f32,
}

impl ChatReasoner {
    /// Builds a reasoner from configuration.
    ///
    /// Fails with [`InquestError::Config`] when no API key is available.
    pub fn from_config(config: &ReasonerConfig) -> Result<Self, InquestError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(LEGACY_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                InquestError::Config(format!(
                    "reasoner.api_key is not set (also checked INQUEST_REASONER_API_KEY and {LEGACY_API_KEY_ENV})"
                ))
            })?;
        let client = ChatClient::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;
        Ok(Self::new(client, config.temperature))
    }

    pub fn new(client: ChatClient, temperature: f32) -> Self {
        Self { client, temperature }
    }
}

#[async_trait]
impl Reasoner for ChatReasoner {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn plan(&self, request: &PlanRequest) -> Result<Plan, InquestError> {
        let temperature = (self.temperature + PLAN_TEMPERATURE_BOOST).min(2.0);
        let content = self
            .client
            .complete(ReasonerOperation::Plan, plan_messages(request), temperature)
            .await?;
        let plan = parse_plan(&content)?;
        debug!(model = self.client.model(), steps = plan.len(), "plan received");
        Ok(plan)
    }

    async fn reflect(&self, request: &ReflectRequest) -> Result<Reflection, InquestError> {
        let content = self
            .client
            .complete(
                ReasonerOperation::Reflect,
                reflect_messages(request),
                self.temperature,
            )
            .await?;
        parse_reflection(&content)
    }

    async fn summarize(&self, request: &SummarizeRequest) -> Result<Synthesis, InquestError> {
        let content = self
            .client
            .complete(
                ReasonerOperation::Summarize,
                summarize_messages(request),
                self.temperature,
            )
            .await?;
        parse_synthesis(&content)
    }
}
