//! Metric-definition lookup.
//!
//! Backs the calculation-explanation shortcut: a case-insensitive substring
//! match against the unique metric name. A miss is a recoverable outcome
//! (`Ok(None)`), rendered as a user-facing apology, never an error.

use crate::record::{MetricDefinition, Record};
use gridfin_core::AppResult;

/// Trait for metric-definition stores.
#[async_trait::async_trait]
pub trait MetricStore: Send + Sync {
    /// Find a definition whose metric name contains `name`,
    /// case-insensitively.
    async fn find_definition(&self, name: &str) -> AppResult<Option<MetricDefinition>>;
}

/// In-memory metric store, loaded from the ingestion records at startup.
#[derive(Debug, Default)]
pub struct MemoryMetricStore {
    definitions: Vec<MetricDefinition>,
}

impl MemoryMetricStore {
    /// Create a store from a list of definitions.
    pub fn new(definitions: Vec<MetricDefinition>) -> Self {
        Self { definitions }
    }

    /// Collect the metric-definition records from a batch.
    pub fn from_records(records: &[Record]) -> Self {
        let definitions = records
            .iter()
            .filter_map(|record| match record {
                Record::MetricDefinition(def) => Some(def.clone()),
                _ => None,
            })
            .collect();
        Self { definitions }
    }

    /// Number of definitions loaded.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the store holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[async_trait::async_trait]
impl MetricStore for MemoryMetricStore {
    async fn find_definition(&self, name: &str) -> AppResult<Option<MetricDefinition>> {
        let needle = name.to_lowercase();
        Ok(self
            .definitions
            .iter()
            .find(|def| def.metric_name.to_lowercase().contains(&needle))
            .cloned())
    }
}

/// Render a found definition as the Markdown explanation answer.
pub fn render_explanation(def: &MetricDefinition) -> String {
    format!(
        "**{} Calculation**\n\n**Formula:** {}\n\n**Description:** {}\n\n**Components:** {}",
        def.metric_name, def.formula, def.description, def.components
    )
}

/// Render the apology answer for a definition that was not found.
pub fn render_missing(name: &str) -> String {
    format!(
        "Sorry, I couldn't find the calculation details for '{}'.",
        name
    )
}
