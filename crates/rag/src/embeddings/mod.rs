//! Embedding generation.
//!
//! Provider-agnostic embedding trait with a hosted OpenAI implementation
//! and a deterministic mock for tests.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, normalize_text, EmbeddingProvider};
pub use providers::{MockEmbeddingProvider, OpenAiEmbeddingProvider};
