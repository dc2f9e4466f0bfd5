//! LLM integration crate for GridFin.
//!
//! Provides a provider-agnostic abstraction for chat completions through a
//! unified trait-based interface.
//!
//! # Providers
//! - **OpenAI**: hosted chat completions (default)
//!
//! # Example
//! ```no_run
//! use gridfin_llm::{ChatMessage, ChatRequest, LlmClient, providers::OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...")?;
//! let request = ChatRequest::new("gpt-4", vec![ChatMessage::user("Hello!")]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, ChatResponse, ChatUsage, LlmClient};
pub use factory::create_client;
pub use providers::OpenAiClient;
