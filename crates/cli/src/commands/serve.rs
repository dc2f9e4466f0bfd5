//! Serve command handler.
//!
//! Runs the HTTP query API. A single shared `QueryEngine` serves all
//! requests; invalid requests map to 400 and everything else to 500, with
//! errors returned as `{"error": ...}` JSON bodies.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use gridfin_core::{config::AppConfig, AppError, AppResult};
use gridfin_rag::{QueryAnswer, QueryEngine};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the HTTP query API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Records file providing metric definitions (JSON array)
    #[arg(short, long)]
    pub records: Option<PathBuf>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let engine = Arc::new(super::build_engine(config, self.records.as_deref())?);
        let app = app_router(engine);

        let listener = tokio::net::TcpListener::bind(self.bind).await?;
        tracing::info!("Listening on http://{}", self.bind);
        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::Other(format!("Server error: {}", e)))?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    #[serde(default)]
    query: Option<String>,
}

pub fn app_router(engine: Arc<QueryEngine>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/query", post(handle_query))
        .with_state(engine)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn handle_query(
    State(engine): State<Arc<QueryEngine>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    let query = request.query.unwrap_or_default();

    match engine.answer(&query).await {
        Ok(answer) => query_response(answer),
        Err(e) => error_response(e),
    }
}

fn query_response(answer: QueryAnswer) -> Response {
    (StatusCode::OK, Json(answer)).into_response()
}

fn error_response(error: AppError) -> Response {
    let status = match &error {
        AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("Query failed: {}", error);
    } else {
        tracing::warn!("Rejected request: {}", error);
    }

    (status, Json(json!({"error": error.to_string()}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfin_index::MemoryIndex;
    use gridfin_llm::{ChatRequest, ChatResponse, ChatUsage, LlmClient};
    use gridfin_rag::{MemoryMetricStore, MockEmbeddingProvider, QueryOptions};
    use tower::ServiceExt;

    struct EchoLlm;

    #[async_trait::async_trait]
    impl LlmClient for EchoLlm {
        fn provider_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &ChatRequest) -> gridfin_core::AppResult<ChatResponse> {
            Ok(ChatResponse {
                content: "ok".to_string(),
                model: request.model.clone(),
                usage: ChatUsage::default(),
            })
        }
    }

    fn test_router() -> Router {
        let engine = QueryEngine::new(
            Arc::new(MemoryIndex::new(8)),
            Arc::new(MockEmbeddingProvider::new(8)),
            Arc::new(EchoLlm),
            Arc::new(MemoryMetricStore::default()),
            QueryOptions {
                namespace: "default".to_string(),
                top_k: 5,
                chat_model: "gpt-4".to_string(),
            },
        );
        app_router(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let app = test_router();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/query")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_index_returns_no_context_answer() {
        let app = test_router();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/query")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(r#"{"query": "What was revenue?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["answer"],
            "No relevant financial data was found for this question."
        );
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
