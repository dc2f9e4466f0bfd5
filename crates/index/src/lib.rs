//! Vector index crate for GridFin.
//!
//! Provides a provider-agnostic, namespaced vector storage abstraction with
//! two backends:
//! - **Pinecone**: hosted index over its data-plane REST API
//! - **Memory**: in-process cosine index for tests and local runs

pub mod memory;
pub mod pinecone;
pub mod types;
pub mod vector_index;

// Re-export main types
pub use memory::MemoryIndex;
pub use pinecone::PineconeIndex;
pub use types::{IndexStats, ScoredMatch, VectorRecord};
pub use vector_index::VectorIndex;
