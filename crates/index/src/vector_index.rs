//! Vector index abstraction.
//!
//! Defines a trait for provider-agnostic, namespaced vector storage and
//! similarity search.

use crate::types::{IndexStats, ScoredMatch, VectorRecord};
use gridfin_core::AppResult;

/// Trait for vector index backends.
///
/// Queries and upserts are scoped to exactly one namespace at a time;
/// cross-namespace search is not supported. Implementations must be safe
/// for concurrent use by independent requests.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// The index's configured vector dimension.
    ///
    /// Every upserted or queried vector must have exactly this length;
    /// implementations reject others with `AppError::DimensionMismatch`.
    fn dimension(&self) -> usize;

    /// Insert or update a batch of records in the given namespace.
    ///
    /// Upserting an existing id overwrites the stored entry. Returns the
    /// number of records written.
    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> AppResult<usize>;

    /// Search the namespace for the `top_k` records most similar to
    /// `vector`, with metadata attached.
    ///
    /// Returns matches ordered by descending similarity; fewer than `top_k`
    /// (including zero) is a valid result.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> AppResult<Vec<ScoredMatch>>;

    /// Get summary statistics for the index.
    async fn describe_stats(&self) -> AppResult<IndexStats>;
}
