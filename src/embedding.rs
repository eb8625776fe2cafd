//! Embedding client abstraction and remote implementation.
//!
//! Defines the [`Embedder`] trait consumed by the index store and the
//! retriever, plus [`RemoteEmbedder`], which calls the provider's
//! `POST {base_url}/embeddings` endpoint.
//!
//! The provider is treated as a black box: the vector dimension is whatever
//! the model returns and is never hard-coded. There is no retry logic — a
//! failed call surfaces as [`RagError::Provider`] and the caller decides
//! whether that is fatal (query embedding, first chunk of a rebuild) or a
//! per-chunk skip (remaining chunks of a rebuild).

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{RagError, Result};

/// Maps text to a fixed-dimension embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedding client backed by a remote HTTP provider.
#[derive(Debug)]
pub struct RemoteEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl RemoteEmbedder {
    /// Create a remote embedder from provider configuration.
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
            model: config.embedding_model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "input": text,
            "model": self.model,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RagError::Provider(format!("embeddings request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(RagError::Provider(format!(
                "embeddings API error {}: {}",
                status, body_text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RagError::Provider(format!("invalid embeddings response: {}", e)))?;

        parse_embedding_response(&json)
    }
}

/// Extract the vector at `data[0].embedding` from a provider response.
fn parse_embedding_response(json: &serde_json::Value) -> Result<Vec<f32>> {
    let embedding = json
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|a| a.first())
        .and_then(|item| item.get("embedding"))
        .and_then(|e| e.as_array())
        .ok_or_else(|| RagError::Provider("embeddings response missing data[0].embedding".into()))?;

    Ok(embedding
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let json = serde_json::json!({
            "data": [{"embedding": [0.25, -1.0, 2.5]}]
        });
        let vec = parse_embedding_response(&json).unwrap();
        assert_eq!(vec, vec![0.25f32, -1.0, 2.5]);
    }

    #[test]
    fn test_parse_missing_data() {
        let json = serde_json::json!({"error": "rate limited"});
        let err = parse_embedding_response(&json).unwrap_err();
        assert!(matches!(err, RagError::Provider(_)));
    }

    #[test]
    fn test_parse_empty_data_array() {
        let json = serde_json::json!({"data": []});
        assert!(parse_embedding_response(&json).is_err());
    }

    #[test]
    fn test_parse_missing_embedding_field() {
        let json = serde_json::json!({"data": [{"index": 0}]});
        assert!(parse_embedding_response(&json).is_err());
    }

    #[test]
    fn test_new_fails_without_api_key() {
        let config = ProviderConfig {
            api_key_env: "DOCRAG_TEST_KEY_THAT_DOES_NOT_EXIST".to_string(),
            ..ProviderConfig::default()
        };
        let err = RemoteEmbedder::new(&config).unwrap_err();
        assert!(err.to_string().contains("not set"));
    }
}
