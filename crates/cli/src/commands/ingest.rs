//! Ingest command handler.
//!
//! Reads typed records and optional text documents, formats them into
//! embedding texts, and upserts the vectors into the index in batches.

use clap::Args;
use gridfin_core::{config::AppConfig, AppError, AppResult};
use gridfin_rag::chunker::chunk_document;
use gridfin_rag::{ingest_chunks, ingest_records, DocumentChunk, IngestReport};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Format, embed, and upsert records into the vector index
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Records file (JSON array of typed records)
    #[arg(short, long)]
    pub records: Option<PathBuf>,

    /// Directory of .txt documents to chunk and ingest
    #[arg(short, long)]
    pub documents: Option<PathBuf>,

    /// Chunk size in characters for document ingestion
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command");

        if self.records.is_none() && self.documents.is_none() {
            return Err(AppError::InvalidRequest(
                "Nothing to ingest; pass a records file, --documents, or both".to_string(),
            ));
        }

        if self.chunk_size == 0 {
            return Err(AppError::InvalidRequest(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        config.validate()?;
        let index = super::build_index(config)?;
        let embedder = super::build_embedder(config)?;

        let mut report = IngestReport::default();

        if let Some(path) = &self.records {
            let records = super::load_records(path)?;
            tracing::info!("Ingesting {} records from {}", records.len(), path.display());

            let r = ingest_records(
                &records,
                embedder.as_ref(),
                index.as_ref(),
                &config.namespace,
                config.batch_size,
            )
            .await?;
            merge(&mut report, &r);
        }

        if let Some(dir) = &self.documents {
            let chunks = self.collect_chunks(dir)?;
            tracing::info!("Ingesting {} chunks from {}", chunks.len(), dir.display());

            let r = ingest_chunks(
                &chunks,
                embedder.as_ref(),
                index.as_ref(),
                &config.namespace,
                config.batch_size,
            )
            .await?;
            merge(&mut report, &r);
        }

        println!(
            "Ingested {} of {} vectors ({} failed batches)",
            report.upserted, report.formatted, report.failed_batches
        );

        if report.failed_batches > 0 {
            return Err(AppError::Embedding(format!(
                "{} batches failed during ingestion",
                report.failed_batches
            )));
        }

        Ok(())
    }

    /// Walk `dir` for .txt files and chunk each into document chunks.
    ///
    /// The document id is the file stem, so re-ingesting the same tree
    /// overwrites the same vector ids.
    fn collect_chunks(&self, dir: &Path) -> AppResult<Vec<DocumentChunk>> {
        let mut chunks = Vec::new();

        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            let document_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();

            let text = std::fs::read_to_string(path)?;
            let document_chunks = chunk_document(&document_id, &text, self.chunk_size);

            tracing::debug!(
                "Chunked {} into {} pieces",
                path.display(),
                document_chunks.len()
            );
            chunks.extend(document_chunks);
        }

        Ok(chunks)
    }
}

fn merge(total: &mut IngestReport, part: &IngestReport) {
    total.formatted += part.formatted;
    total.upserted += part.upserted;
    total.failed_batches += part.failed_batches;
}
