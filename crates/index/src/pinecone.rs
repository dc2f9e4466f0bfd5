//! Pinecone vector index backend.
//!
//! Talks to a Pinecone index's data plane over its REST API.
//! API reference: https://docs.pinecone.io/reference/api/data-plane

use crate::types::{IndexStats, ScoredMatch, VectorRecord};
use crate::vector_index::VectorIndex;
use gridfin_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    dimension: usize,
    #[serde(rename = "totalVectorCount", default)]
    total_vector_count: u64,
    #[serde(default)]
    namespaces: HashMap<String, NamespaceSummary>,
}

#[derive(Debug, Deserialize)]
struct NamespaceSummary {
    #[serde(rename = "vectorCount", default)]
    vector_count: u64,
}

/// Pinecone index client.
pub struct PineconeIndex {
    /// Index data-plane host URL
    host: String,

    /// API key sent in the `Api-Key` header
    api_key: String,

    /// Configured vector dimension, fixed at index creation time
    dimension: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl PineconeIndex {
    /// Create a new Pinecone index client.
    ///
    /// `dimension` must match the dimension the index was created with;
    /// mismatched vectors are rejected locally before any network call.
    pub fn new(
        host: impl Into<String>,
        api_key: impl Into<String>,
        dimension: usize,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                AppError::Retrieval(format!("Failed to create HTTP client for Pinecone: {}", e))
            })?;

        Ok(Self {
            host: host.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            dimension,
            client,
        })
    }

    fn check_dimension(&self, vector_len: usize) -> AppResult<()> {
        if vector_len != self.dimension {
            return Err(AppError::DimensionMismatch {
                expected: self.dimension,
                actual: vector_len,
            });
        }
        Ok(())
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<R> {
        let url = format!("{}{}", self.host, path);

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to reach Pinecone: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Pinecone API error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse Pinecone response: {}", e)))
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> AppResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        for record in records {
            self.check_dimension(record.values.len())?;
        }

        tracing::debug!(
            namespace,
            count = records.len(),
            "Upserting vectors to Pinecone"
        );

        let body = UpsertRequest {
            vectors: records,
            namespace,
        };

        let response: UpsertResponse = self.post("/vectors/upsert", &body).await?;

        Ok(response.upserted_count)
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> AppResult<Vec<ScoredMatch>> {
        self.check_dimension(vector.len())?;

        tracing::debug!(namespace, top_k, "Querying Pinecone");

        let body = QueryRequest {
            namespace,
            vector,
            top_k,
            include_metadata: true,
        };

        let response: QueryResponse = self.post("/query", &body).await?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| ScoredMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or(serde_json::Value::Null),
            })
            .collect())
    }

    async fn describe_stats(&self) -> AppResult<IndexStats> {
        let response: StatsResponse =
            self.post("/describe_index_stats", &serde_json::json!({})).await?;

        Ok(IndexStats {
            dimension: response.dimension,
            total_vector_count: response.total_vector_count,
            namespaces: response
                .namespaces
                .into_iter()
                .map(|(name, summary)| (name, summary.vector_count))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimension() {
        let index = PineconeIndex::new("https://idx.example.pinecone.io", "key", 1536).unwrap();

        let records = vec![VectorRecord {
            id: "a".to_string(),
            values: vec![0.0; 384],
            metadata: serde_json::json!({}),
        }];

        let err = index.upsert("default", &records).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::DimensionMismatch {
                expected: 1536,
                actual: 384
            }
        ));
    }

    #[tokio::test]
    async fn test_query_rejects_wrong_dimension() {
        let index = PineconeIndex::new("https://idx.example.pinecone.io", "key", 1536).unwrap();

        let err = index.query("default", &[0.0; 8], 5).await.unwrap_err();
        assert!(matches!(err, AppError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_query_wire_format() {
        let vector = vec![0.5_f32; 3];
        let body = QueryRequest {
            namespace: "default",
            vector: &vector,
            top_k: 5,
            include_metadata: true,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["topK"], 5);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["namespace"], "default");
    }

    #[test]
    fn test_stats_response_parsing() {
        let raw = r#"{
            "dimension": 1536,
            "totalVectorCount": 420,
            "namespaces": {"default": {"vectorCount": 400}, "ppa-contracts": {"vectorCount": 20}}
        }"#;

        let parsed: StatsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.dimension, 1536);
        assert_eq!(parsed.total_vector_count, 420);
        assert_eq!(parsed.namespaces["ppa-contracts"].vector_count, 20);
    }
}
