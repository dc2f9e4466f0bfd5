//! Retrieval-augmented question answering over structured financial data.
//!
//! The pipeline has two halves. Offline, [`ingest`] formats typed records
//! and document chunks into embedding texts and upserts them into a vector
//! index in batches. Online, the [`engine::QueryEngine`] routes each
//! question either to a deterministic metric-definition lookup or through
//! retrieval, context composition, and LLM answer generation.

pub mod answer;
pub mod chunker;
pub mod compose;
pub mod embeddings;
pub mod engine;
pub mod format;
pub mod ingest;
pub mod metrics;
pub mod record;
pub mod retrieve;
pub mod router;

pub use embeddings::{create_provider, EmbeddingProvider, MockEmbeddingProvider};
pub use engine::{QueryAnswer, QueryEngine, QueryOptions};
pub use ingest::{ingest_chunks, ingest_records, IngestReport};
pub use metrics::{MemoryMetricStore, MetricStore};
pub use record::{DocumentChunk, MetricDefinition, Record};
