use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use shadow_core::{OracleError, OracleRequest, PatternOracle};
use std::time::Duration;
use tracing::info;

use crate::retry::retry_with_backoff;

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicOracle {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    retry_delays: Vec<Duration>,
}

impl AnthropicOracle {
    pub fn new(api_key: String) -> Self {
        info!("Creating AnthropicOracle");
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
            model: Self::default_model().to_string(),
            retry_delays: vec![Duration::from_secs(1), Duration::from_secs(2)],
        }
    }

    #[must_use]
    pub const fn default_model() -> &'static str {
        "claude-sonnet-4-20250514"
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    fn build_body(&self, request: &OracleRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "messages": [{ "role": "user", "content": request.prompt }],
        })
    }

    /// Helper method to send a single request
    async fn try_send(&self, body: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url.trim_end_matches('/')))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;
        Ok(response)
    }
}

/// Text of the first content block, if it is a text block.
fn first_text_block(response: &serde_json::Value) -> Option<String> {
    let block = response["content"].get(0)?;
    if block["type"].as_str()? != "text" {
        return None;
    }
    block["text"].as_str().map(str::to_string)
}

#[async_trait]
impl PatternOracle for AnthropicOracle {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = self.build_body(request);

        info!(
            "Sending request to Anthropic API: model={}, max_tokens={}",
            self.model, request.max_tokens
        );

        let response = retry_with_backoff(|| self.try_send(&body), &self.retry_delays).await?;

        info!("Received response from Anthropic API");
        first_text_block(&response).ok_or(OracleError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_single_user_turn() {
        let oracle = AnthropicOracle::new("sk-test".to_string()).with_model("test-model".to_string());
        let body = oracle.build_body(&OracleRequest::new("hello").with_max_tokens(2000));

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_retry_delays_are_configurable() {
        let oracle = AnthropicOracle::new("sk-test".to_string());
        assert_eq!(oracle.retry_delays.len(), 2);

        let oracle = oracle.with_retry_delays(vec![Duration::ZERO]);
        assert_eq!(oracle.retry_delays, vec![Duration::ZERO]);
        assert_eq!(oracle.name(), "anthropic");
    }

    #[test]
    fn test_extracts_first_text_block() {
        let response = json!({
            "content": [{ "type": "text", "text": "[]" }, { "type": "text", "text": "ignored" }]
        });
        assert_eq!(first_text_block(&response).as_deref(), Some("[]"));
    }

    #[test]
    fn test_non_text_or_missing_content_is_none() {
        assert!(first_text_block(&json!({ "content": [{ "type": "tool_use", "id": "x" }] })).is_none());
        assert!(first_text_block(&json!({ "content": [] })).is_none());
        assert!(first_text_block(&json!({ "error": "overloaded" })).is_none());
    }
}
