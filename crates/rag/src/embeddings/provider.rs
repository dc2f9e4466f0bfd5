//! Embedding provider trait and factory.

use gridfin_core::{AppError, AppResult};
use std::sync::Arc;

/// Collapse newlines to spaces and trim, matching what the embedding
/// service expects as a single-line input.
pub fn normalize_text(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get provider name (e.g., "openai", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    ///
    /// The result has exactly one vector per input slot, in order. A slot
    /// that is empty after normalization yields a zero vector and a
    /// warning rather than failing the whole batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    ///
    /// Unlike the batch variant, empty input here is an `Embedding` error.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if normalize_text(text).is_empty() {
            return Err(AppError::Embedding("Cannot embed empty text".to_string()));
        }

        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on a provider name.
pub fn create_provider(
    provider: &str,
    model: &str,
    dimensions: usize,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI embedding provider requires API key".to_string())
            })?;
            let provider =
                super::providers::openai::OpenAiEmbeddingProvider::new(api_key, model, dimensions)?;
            Ok(Arc::new(provider))
        }

        "mock" => {
            let provider = super::providers::mock::MockEmbeddingProvider::new(dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: openai, mock",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_newlines() {
        assert_eq!(normalize_text("a\nb\nc"), "a b c");
        assert_eq!(normalize_text("  \n \n "), "");
    }

    #[test]
    fn test_create_mock_provider() {
        let provider = create_provider("mock", "mock-v1", 64, None).unwrap();
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.dimensions(), 64);
    }

    #[test]
    fn test_create_unknown_provider() {
        match create_provider("unknown", "m", 64, None) {
            Err(err) => assert!(err.to_string().contains("Unknown embedding provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }

    #[test]
    fn test_openai_requires_api_key() {
        let result = create_provider("openai", "text-embedding-3-small", 1536, None);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_embed_empty_text_is_error() {
        let provider = create_provider("mock", "mock-v1", 64, None).unwrap();
        let result = provider.embed("\n \n").await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }
}
