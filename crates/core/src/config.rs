//! Configuration management for GridFin.
//!
//! Configuration is merged from multiple sources with the precedence
//! CLI flags > environment variables > config file > defaults.
//!
//! Credentials (OpenAI, Pinecone) come from the environment only and are
//! validated before any traffic is served — a missing secret fails fast.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default number of matches requested from the vector index.
///
/// The canonical retrieval policy: top_k is explicit configuration, not a
/// constant buried in the query path.
pub const DEFAULT_TOP_K: usize = 5;

/// Default vector-index namespace for financial records.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default batch size for vector-index upserts.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenAI API key (embeddings + completions)
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    /// Pinecone API key
    #[serde(skip_serializing)]
    pub pinecone_api_key: Option<String>,

    /// Pinecone index data-plane host, e.g. "https://my-index-abc123.svc.xyz.pinecone.io"
    pub pinecone_index_host: Option<String>,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimension (must match the index's configured dimension)
    pub embedding_dimensions: usize,

    /// Chat completion model identifier
    pub chat_model: String,

    /// Vector-index namespace scoping all queries and upserts
    pub namespace: String,

    /// Number of matches requested per retrieval
    pub top_k: usize,

    /// Maximum vectors per upsert batch
    pub batch_size: usize,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// On-disk configuration file structure (gridfin.yaml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    index: Option<IndexConfig>,
    models: Option<ModelConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexConfig {
    host: Option<String>,
    namespace: Option<String>,
    top_k: Option<usize>,
    batch_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelConfig {
    embedding_model: Option<String>,
    embedding_dimensions: Option<usize>,
    chat_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            pinecone_api_key: None,
            pinecone_index_host: None,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: 1536,
            chat_model: "gpt-4".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            top_k: DEFAULT_TOP_K,
            batch_size: DEFAULT_BATCH_SIZE,
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file (if present) and environment.
    ///
    /// Environment variables:
    /// - `OPENAI_API_KEY`: OpenAI credential
    /// - `PINECONE_API_KEY`: Pinecone credential
    /// - `PINECONE_INDEX_HOST`: Pinecone index data-plane host URL
    /// - `GRIDFIN_CONFIG`: path to a gridfin.yaml config file
    /// - `GRIDFIN_NAMESPACE`: vector-index namespace
    /// - `GRIDFIN_TOP_K`: retrieval match count
    /// - `GRIDFIN_EMBEDDING_MODEL` / `GRIDFIN_CHAT_MODEL`: model overrides
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("GRIDFIN_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("gridfin.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override the config file
        config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        config.pinecone_api_key = std::env::var("PINECONE_API_KEY").ok();

        if let Ok(host) = std::env::var("PINECONE_INDEX_HOST") {
            config.pinecone_index_host = Some(host);
        }

        if let Ok(namespace) = std::env::var("GRIDFIN_NAMESPACE") {
            config.namespace = namespace;
        }

        if let Ok(top_k) = std::env::var("GRIDFIN_TOP_K") {
            config.top_k = top_k
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid GRIDFIN_TOP_K: {}", top_k)))?;
        }

        if let Ok(model) = std::env::var("GRIDFIN_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }

        if let Ok(model) = std::env::var("GRIDFIN_CHAT_MODEL") {
            config.chat_model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(index) = config_file.index {
            if let Some(host) = index.host {
                result.pinecone_index_host = Some(host);
            }
            if let Some(namespace) = index.namespace {
                result.namespace = namespace;
            }
            if let Some(top_k) = index.top_k {
                result.top_k = top_k;
            }
            if let Some(batch_size) = index.batch_size {
                result.batch_size = batch_size;
            }
        }

        if let Some(models) = config_file.models {
            if let Some(model) = models.embedding_model {
                result.embedding_model = model;
            }
            if let Some(dims) = models.embedding_dimensions {
                result.embedding_dimensions = dims;
            }
            if let Some(model) = models.chat_model {
                result.chat_model = model;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and files.
    pub fn with_overrides(
        mut self,
        namespace: Option<String>,
        top_k: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(namespace) = namespace {
            self.namespace = namespace;
        }

        if let Some(top_k) = top_k {
            self.top_k = top_k;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate that every required credential is present.
    ///
    /// Called before serving traffic or running ingestion; absence of any
    /// secret is a startup failure, not a per-request one.
    pub fn validate(&self) -> AppResult<()> {
        if self.openai_api_key.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::Config(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        if self.pinecone_api_key.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::Config(
                "PINECONE_API_KEY is not set".to_string(),
            ));
        }

        if self.pinecone_index_host.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::Config(
                "PINECONE_INDEX_HOST is not set".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be greater than 0".to_string()));
        }

        Ok(())
    }
}
