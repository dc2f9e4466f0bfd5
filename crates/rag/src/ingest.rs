//! Ingestion pipeline.
//!
//! Formats records, generates embeddings, and upserts (id, vector,
//! metadata) triples into a single namespace in batches.
//!
//! Semantics are best-effort and at-least-once: a failed batch is logged
//! with its index and skipped, later batches still run, and a caller
//! re-runs the whole ingestion to fill gaps. Deterministic ids make an
//! identical re-run an overwrite; no transactional guarantee spans batches.

use crate::embeddings::provider::{normalize_text, EmbeddingProvider};
use crate::format::{format_chunk, format_record, FormattedRecord};
use crate::record::{DocumentChunk, Record};
use gridfin_core::{AppError, AppResult};
use gridfin_index::{VectorIndex, VectorRecord};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records formatted (before the empty-text filter)
    pub formatted: usize,

    /// Vectors successfully upserted
    pub upserted: usize,

    /// Batches that failed and were skipped
    pub failed_batches: usize,
}

/// Ingest typed records into `namespace`.
pub async fn ingest_records(
    records: &[Record],
    provider: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    namespace: &str,
    batch_size: usize,
) -> AppResult<IngestReport> {
    let formatted = records
        .iter()
        .enumerate()
        .map(|(sequence, record)| format_record(record, sequence))
        .collect::<AppResult<Vec<_>>>()?;

    ingest_formatted(formatted, provider, index, namespace, batch_size).await
}

/// Ingest free-text document chunks into `namespace`.
pub async fn ingest_chunks(
    chunks: &[DocumentChunk],
    provider: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    namespace: &str,
    batch_size: usize,
) -> AppResult<IngestReport> {
    let formatted = chunks.iter().map(format_chunk).collect();
    ingest_formatted(formatted, provider, index, namespace, batch_size).await
}

async fn ingest_formatted(
    formatted: Vec<FormattedRecord>,
    provider: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    namespace: &str,
    batch_size: usize,
) -> AppResult<IngestReport> {
    if batch_size == 0 {
        return Err(AppError::Config(
            "batch_size must be greater than 0".to_string(),
        ));
    }

    // A provider/index dimension disagreement fails the whole run up front;
    // it cannot heal mid-run.
    if provider.dimensions() != index.dimension() {
        return Err(AppError::DimensionMismatch {
            expected: index.dimension(),
            actual: provider.dimensions(),
        });
    }

    let mut report = IngestReport {
        formatted: formatted.len(),
        ..IngestReport::default()
    };

    // Drop entries with nothing to embed rather than storing zero vectors.
    let entries: Vec<FormattedRecord> = formatted
        .into_iter()
        .filter(|entry| {
            let keep = !normalize_text(&entry.text).is_empty();
            if !keep {
                tracing::warn!(id = %entry.id, "Skipping entry with empty text");
            }
            keep
        })
        .collect();

    tracing::info!(
        namespace,
        total = entries.len(),
        batch_size,
        "Starting ingestion"
    );

    for (batch_index, batch) in entries.chunks(batch_size).enumerate() {
        let texts: Vec<String> = batch.iter().map(|e| e.text.clone()).collect();

        let embeddings = match provider.embed_batch(&texts).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                tracing::error!(batch_index, error = %e, "Embedding failed for batch, skipping");
                report.failed_batches += 1;
                continue;
            }
        };

        let vectors: Vec<VectorRecord> = batch
            .iter()
            .zip(embeddings)
            .map(|(entry, values)| VectorRecord {
                id: entry.id.clone(),
                values,
                metadata: entry.metadata.clone(),
            })
            .collect();

        match index.upsert(namespace, &vectors).await {
            Ok(count) => {
                tracing::debug!(batch_index, count, "Upserted batch");
                report.upserted += count;
            }
            Err(e) => {
                tracing::error!(batch_index, error = %e, "Upsert failed for batch, skipping");
                report.failed_batches += 1;
            }
        }
    }

    tracing::info!(
        namespace,
        upserted = report.upserted,
        failed_batches = report.failed_batches,
        "Ingestion finished"
    );

    Ok(report)
}
