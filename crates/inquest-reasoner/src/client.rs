// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Provides [`ChatClient`] which handles bearer authentication, the per-call
//! timeout, and a bounded retry on transient statuses (429, 500, 503).

use std::time::Duration;

use inquest_core::{InquestError, ReasonerOperation};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// Low-level chat client. Returns the raw content of the first choice.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl ChatClient {
    /// Creates a client for `base_url` (the full completions endpoint URL).
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, InquestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InquestError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url,
            model,
            max_retries,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat completion and returns the first choice's content.
    ///
    /// Transport failures and non-2xx statuses are
    /// [`InquestError::ReasonerUnavailable`]; a 2xx body without usable
    /// content is [`InquestError::ReasonerContract`].
    pub async fn complete(
        &self,
        operation: ReasonerOperation,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, InquestError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature,
            response_format: ResponseFormat::json_object(),
        };

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(%operation, attempt, "retrying reasoner request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| InquestError::ReasonerUnavailable {
                    operation,
                    message: if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        format!("HTTP request failed: {e}")
                    },
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(%operation, status = %status, attempt, "reasoner response received");

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| InquestError::ReasonerUnavailable {
                        operation,
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return first_choice_content(operation, &body);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(%operation, status = %status, "transient error, will retry");
                last_error = Some(InquestError::unavailable(
                    operation,
                    format!("API returned {status}: {body}"),
                ));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "API error {status} ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(InquestError::unavailable(operation, message));
        }

        Err(last_error.unwrap_or_else(|| {
            InquestError::unavailable(operation, "request failed after retries")
        }))
    }
}

fn first_choice_content(operation: ReasonerOperation, body: &str) -> Result<String, InquestError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        InquestError::contract(operation, format!("malformed completion envelope: {e}"))
    })?;
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| InquestError::contract(operation, "response has no choices"))?
        .message
        .content
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(InquestError::contract(operation, "response content is empty"));
    }
    Ok(content)
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> ChatClient {
        ChatClient::new(
            "test-key".into(),
            uri.to_string(),
            "test-model".into(),
            Duration::from_secs(5),
            1,
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(10))
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "cmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn sends_bearer_and_json_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let content = client(&server.uri())
            .complete(ReasonerOperation::Plan, vec![ChatMessage::user("hi")], 0.2)
            .await
            .unwrap();
        assert_eq!(content, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
            .mount(&server)
            .await;

        let content = client(&server.uri())
            .complete(ReasonerOperation::Reflect, vec![], 0.1)
            .await
            .unwrap();
        assert_eq!(content, "{}");
    }

    #[tokio::test]
    async fn exhausted_retries_are_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .complete(ReasonerOperation::Summarize, vec![], 0.1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "reasoner_unavailable");
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"type": "invalid_api_key", "message": "bad key"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .complete(ReasonerOperation::Plan, vec![], 0.2)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid_api_key"), "got: {err}");
        assert_eq!(err.kind(), "reasoner_unavailable");
    }

    #[tokio::test]
    async fn missing_choices_is_a_contract_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .complete(ReasonerOperation::Plan, vec![], 0.2)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "reasoner_contract");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let err = client("http://127.0.0.1:9")
            .complete(ReasonerOperation::Plan, vec![], 0.2)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "reasoner_unavailable");
    }
}
