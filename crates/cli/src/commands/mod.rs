//! Command handlers for the GridFin CLI.

mod ingest;
mod query;
mod serve;
mod stats;

pub use ingest::IngestCommand;
pub use query::QueryCommand;
pub use serve::ServeCommand;
pub use stats::StatsCommand;

use gridfin_core::{config::AppConfig, AppError, AppResult};
use gridfin_index::{PineconeIndex, VectorIndex};
use gridfin_llm::{create_client, LlmClient};
use gridfin_rag::{
    create_provider, EmbeddingProvider, MemoryMetricStore, QueryEngine, QueryOptions, Record,
};
use std::path::Path;
use std::sync::Arc;

/// Build the vector index client from validated configuration.
fn build_index(config: &AppConfig) -> AppResult<Arc<dyn VectorIndex>> {
    let host = config
        .pinecone_index_host
        .as_deref()
        .ok_or_else(|| AppError::Config("PINECONE_INDEX_HOST is not set".to_string()))?;
    let api_key = config
        .pinecone_api_key
        .as_deref()
        .ok_or_else(|| AppError::Config("PINECONE_API_KEY is not set".to_string()))?;

    let index = PineconeIndex::new(host, api_key, config.embedding_dimensions)?;
    Ok(Arc::new(index))
}

/// Build the embedding provider from validated configuration.
fn build_embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    create_provider(
        "openai",
        &config.embedding_model,
        config.embedding_dimensions,
        config.openai_api_key.as_deref(),
    )
}

/// Read a records file (JSON array of typed records).
fn load_records(path: &Path) -> AppResult<Vec<Record>> {
    let contents = std::fs::read_to_string(path)?;
    let records: Vec<Record> = serde_json::from_str(&contents)?;
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Build the full query engine from validated configuration.
///
/// The metric-definition store is loaded from the optional records file;
/// without one the store is empty and every calculation question gets the
/// not-found answer.
fn build_engine(config: &AppConfig, records_file: Option<&Path>) -> AppResult<QueryEngine> {
    config.validate()?;

    let index = build_index(config)?;
    let embedder = build_embedder(config)?;
    let llm: Arc<dyn LlmClient> =
        create_client("openai", None, config.openai_api_key.as_deref())?;

    let metrics = match records_file {
        Some(path) => {
            let records = load_records(path)?;
            MemoryMetricStore::from_records(&records)
        }
        None => MemoryMetricStore::default(),
    };
    tracing::debug!("Metric store holds {} definitions", metrics.len());

    Ok(QueryEngine::new(
        index,
        embedder,
        llm,
        Arc::new(metrics),
        QueryOptions {
            namespace: config.namespace.clone(),
            top_k: config.top_k,
            chat_model: config.chat_model.clone(),
        },
    ))
}
