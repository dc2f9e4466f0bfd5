//! Query orchestration.
//!
//! Wires the intent router, retriever, context composer, and answer
//! generator into the end-to-end query pipeline. The engine owns shared
//! handles to the remote-service clients and is stateless per request, so
//! one instance serves concurrent requests.

use crate::answer::{self, NO_CONTEXT_ANSWER};
use crate::compose::compose_context;
use crate::embeddings::EmbeddingProvider;
use crate::metrics::{render_explanation, render_missing, MetricStore};
use crate::retrieve::retrieve;
use crate::router::{route, QueryIntent};
use gridfin_core::{AppError, AppResult};
use gridfin_index::VectorIndex;
use gridfin_llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-engine retrieval and generation settings.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Vector-index namespace scoping the search
    pub namespace: String,

    /// Number of matches requested per retrieval
    pub top_k: usize,

    /// Chat completion model identifier
    pub chat_model: String,
}

/// The answer to one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub query: String,
    pub answer: String,
}

/// End-to-end query engine.
pub struct QueryEngine {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmClient>,
    metrics: Arc<dyn MetricStore>,
    options: QueryOptions,
}

impl QueryEngine {
    /// Create an engine from shared service handles.
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
        metrics: Arc<dyn MetricStore>,
        options: QueryOptions,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            metrics,
            options,
        }
    }

    /// The engine's retrieval and generation settings.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Answer a natural-language financial question.
    ///
    /// An empty query fails fast with `InvalidRequest` before any remote
    /// call. A "how is X calculated" question is answered straight from
    /// the metric-definition store, skipping retrieval entirely; a lookup
    /// miss becomes the apology answer, not an error. Otherwise the query
    /// runs retrieval → composition → generation, short-circuiting to the
    /// no-context answer when nothing was retrieved.
    pub async fn answer(&self, query: &str) -> AppResult<QueryAnswer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidRequest("No query provided".to_string()));
        }

        if let QueryIntent::ExplainMetric(name) = route(query) {
            tracing::info!(metric = %name, "Routing to metric-definition lookup");

            let answer = match self.metrics.find_definition(&name).await? {
                Some(def) => render_explanation(&def),
                None => render_missing(&name),
            };

            return Ok(QueryAnswer {
                query: query.to_string(),
                answer,
            });
        }

        let matches = retrieve(
            query,
            self.embedder.as_ref(),
            self.index.as_ref(),
            &self.options.namespace,
            self.options.top_k,
        )
        .await?;

        let context = compose_context(&matches);

        if context.is_empty() {
            tracing::info!("No relevant matches; skipping generation");
            return Ok(QueryAnswer {
                query: query.to_string(),
                answer: NO_CONTEXT_ANSWER.to_string(),
            });
        }

        let answer = answer::generate_answer(
            self.llm.as_ref(),
            &self.options.chat_model,
            &context,
            query,
        )
        .await?;

        Ok(QueryAnswer {
            query: query.to_string(),
            answer,
        })
    }
}
