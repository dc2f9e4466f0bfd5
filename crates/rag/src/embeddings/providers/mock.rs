//! Mock embedding provider.
//!
//! Generates deterministic, content-dependent vectors by hashing words into
//! dimensions. Not semantically meaningful, but similar texts share words
//! and therefore dimensions, which is enough for exercising retrieval in
//! tests without a hosted embedding service.

use crate::embeddings::provider::{normalize_text, EmbeddingProvider};
use gridfin_core::AppResult;
use std::collections::HashMap;

/// Mock provider for testing and local development.
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let normalized = normalize_text(text).to_lowercase();
        if normalized.is_empty() {
            return embedding;
        }

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for word in normalized.split_whitespace() {
            *counts.entry(word).or_insert(0) += 1;
        }

        for (word, count) in counts {
            let hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(131).wrapping_add(b as u64));
            let dim = (hash as usize) % self.dimensions;
            embedding[dim] += (count as f32).sqrt();
        }

        // Unit-normalize so cosine scores are comparable
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-hash-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
