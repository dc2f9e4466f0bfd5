//! In-memory vector index.
//!
//! Cosine-similarity backend for tests and local runs, implementing the
//! same namespaced contract as the Pinecone client. Entries live in a
//! per-namespace map keyed by id, so upserting an existing id overwrites.

use crate::types::{IndexStats, ScoredMatch, VectorRecord};
use crate::vector_index::VectorIndex;
use gridfin_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector index with cosine-similarity search.
pub struct MemoryIndex {
    dimension: usize,
    namespaces: RwLock<HashMap<String, HashMap<String, VectorRecord>>>,
}

impl MemoryIndex {
    /// Create an empty index with the given vector dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            namespaces: RwLock::new(HashMap::new()),
        }
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
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait::async_trait]
impl VectorIndex for MemoryIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> AppResult<usize> {
        for record in records {
            self.check_dimension(record.values.len())?;
        }

        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|_| AppError::Retrieval("Index lock poisoned".to_string()))?;
        let entries = namespaces.entry(namespace.to_string()).or_default();

        for record in records {
            entries.insert(record.id.clone(), record.clone());
        }

        Ok(records.len())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> AppResult<Vec<ScoredMatch>> {
        self.check_dimension(vector.len())?;

        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| AppError::Retrieval("Index lock poisoned".to_string()))?;

        let mut matches: Vec<ScoredMatch> = namespaces
            .get(namespace)
            .map(|entries| {
                entries
                    .values()
                    .map(|record| ScoredMatch {
                        id: record.id.clone(),
                        score: cosine_similarity(vector, &record.values),
                        metadata: record.metadata.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn describe_stats(&self) -> AppResult<IndexStats> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| AppError::Retrieval("Index lock poisoned".to_string()))?;

        let per_namespace: HashMap<String, u64> = namespaces
            .iter()
            .map(|(name, entries)| (name.clone(), entries.len() as u64))
            .collect();

        Ok(IndexStats {
            dimension: self.dimension,
            total_vector_count: per_namespace.values().sum(),
            namespaces: per_namespace,
        })
    }
}
