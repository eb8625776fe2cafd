//! Completion client abstraction and remote implementation.
//!
//! Defines the [`Completer`] trait used by the query orchestrator and
//! [`RemoteCompleter`], which calls the provider's
//! `POST {base_url}/chat/completions` endpoint with a single user message.
//!
//! Output length and temperature are fixed configuration constants, not
//! per-request parameters. Failures are not retried.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{RagError, Result};

/// Maps a prompt string to generated text.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Completion client backed by a remote HTTP provider.
pub struct RemoteCompleter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl RemoteCompleter {
    /// Create a remote completer from provider configuration.
    ///
    /// Resolves the API key from the environment variable named by
    /// `provider.api_key_env`; fails if it is not set.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| RagError::Provider(format!("{} not set", config.api_key_env)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RagError::Provider(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.completion_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl Completer for RemoteCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "messages": [{"role": "user", "content": prompt}],
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RagError::Provider(format!("completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(RagError::Provider(format!(
                "completions API error {}: {}",
                status, body_text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RagError::Provider(format!("invalid completion response: {}", e)))?;

        parse_completion_response(&json)
    }
}

/// Extract the text at `choices[0].message.content` from a provider response.
fn parse_completion_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            RagError::Provider("completion response missing choices[0].message.content".into())
        })
}
