//! Query-time retrieval.
//!
//! Embeds the query and runs a namespaced top-k similarity search. Results
//! keep the index's descending-similarity order; no local re-ranking.

use crate::embeddings::EmbeddingProvider;
use gridfin_core::{AppError, AppResult};
use gridfin_index::{ScoredMatch, VectorIndex};

/// Retrieve up to `top_k` matches for `query` from `namespace`.
///
/// If embedding fails, the whole operation fails with that error and no
/// search is attempted. An empty match set is a valid, non-error result.
pub async fn retrieve(
    query: &str,
    provider: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    namespace: &str,
    top_k: usize,
) -> AppResult<Vec<ScoredMatch>> {
    let embedding = provider.embed(query).await?;

    if embedding.len() != index.dimension() {
        return Err(AppError::DimensionMismatch {
            expected: index.dimension(),
            actual: embedding.len(),
        });
    }

    let matches = index.query(namespace, &embedding, top_k).await?;

    tracing::debug!(
        namespace,
        top_k,
        matched = matches.len(),
        "Retrieved similarity matches"
    );

    Ok(matches)
}
