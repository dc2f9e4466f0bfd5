//! OpenAI embedding provider.
//!
//! API reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::embeddings::provider::{normalize_text, EmbeddingProvider};
use gridfin_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const EMBEDDINGS_ENDPOINT: &str = "/v1/embeddings";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    /// HTTP client for API requests
    client: reqwest::Client,
    /// OpenAI API base URL
    base_url: String,
    /// API key
    api_key: String,
    /// Model name (e.g., "text-embedding-3-small")
    model: String,
    /// Expected embedding dimensions
    dimensions: usize,
}

impl OpenAiEmbeddingProvider {
    /// Create a new OpenAI embedding provider.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> AppResult<Self> {
        Self::with_base_url(api_key, model, dimensions, DEFAULT_OPENAI_URL)
    }

    /// Create a provider with a custom base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        base_url: impl Into<String>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                AppError::Embedding(format!("Failed to create HTTP client for OpenAI: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            dimensions,
        })
    }

    async fn request_embeddings(&self, inputs: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}{}", self.base_url, EMBEDDINGS_ENDPOINT);

        let body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to send request to OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let mut body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse OpenAI response: {}", e)))?;

        if body.data.len() != inputs.len() {
            return Err(AppError::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                body.data.len(),
                inputs.len()
            )));
        }

        // The API indexes results explicitly; restore input order
        body.data.sort_by_key(|d| d.index);

        let mut embeddings = Vec::with_capacity(body.data.len());
        for data in body.data {
            if data.embedding.len() != self.dimensions {
                return Err(AppError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: data.embedding.len(),
                });
            }
            embeddings.push(data.embedding);
        }

        Ok(embeddings)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Normalize every slot, remembering which are empty so the response
        // can be realigned to the input positions.
        let mut inputs = Vec::new();
        let mut slots = Vec::with_capacity(texts.len());

        for (i, text) in texts.iter().enumerate() {
            let normalized = normalize_text(text);
            if normalized.is_empty() {
                tracing::warn!("Skipping empty text at index {}", i);
                slots.push(None);
            } else {
                slots.push(Some(inputs.len()));
                inputs.push(normalized);
            }
        }

        let fetched = if inputs.is_empty() {
            Vec::new()
        } else {
            tracing::debug!(
                batch_size = inputs.len(),
                model = %self.model,
                "Embedding batch via OpenAI"
            );
            self.request_embeddings(&inputs).await?
        };

        Ok(slots
            .into_iter()
            .map(|slot| match slot {
                Some(i) => fetched[i].clone(),
                None => vec![0.0; self.dimensions],
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_metadata() {
        let provider =
            OpenAiEmbeddingProvider::new("sk-test", "text-embedding-3-small", 1536).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_name(), "text-embedding-3-small");
        assert_eq!(provider.dimensions(), 1536);
    }

    #[test]
    fn test_request_wire_format() {
        let inputs = vec!["first".to_string(), "second".to_string()];
        let body = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &inputs,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"][1], "second");
    }

    #[test]
    fn test_response_parsing_out_of_order() {
        let raw = r#"{
            "data": [
                {"index": 1, "embedding": [0.3, 0.4]},
                {"index": 0, "embedding": [0.1, 0.2]}
            ]
        }"#;

        let mut parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        parsed.data.sort_by_key(|d| d.index);

        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
        assert_eq!(parsed.data[1].embedding, vec![0.3, 0.4]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let provider =
            OpenAiEmbeddingProvider::new("sk-test", "text-embedding-3-small", 1536).unwrap();
        let embeddings = provider.embed_batch(&[]).await.unwrap();
        assert!(embeddings.is_empty());
    }

    #[tokio::test]
    async fn test_all_empty_slots_never_call_api() {
        // An unroutable base URL: if the provider tried the network, this
        // would fail rather than return zero vectors.
        let provider = OpenAiEmbeddingProvider::with_base_url(
            "sk-test",
            "text-embedding-3-small",
            4,
            "http://127.0.0.1:1",
        )
        .unwrap();

        let embeddings = provider
            .embed_batch(&["".to_string(), "\n".to_string()])
            .await
            .unwrap();

        assert_eq!(embeddings.len(), 2);
        assert!(embeddings.iter().all(|e| e.iter().all(|&x| x == 0.0)));
    }
}
