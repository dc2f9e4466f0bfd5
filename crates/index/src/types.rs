//! Vector index type definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single (id, embedding, metadata) triple persisted in the index.
///
/// `id` must be unique within a namespace; upserting the same id overwrites
/// the stored entry. `metadata` always carries a `data_type` field naming
/// the record variant it was formatted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,

    /// Embedding vector; length must equal the index's configured dimension
    pub values: Vec<f32>,

    /// Flat metadata mapping rendered back into context lines at query time
    pub metadata: serde_json::Value,
}

/// One retrieval match: stored metadata plus the index-reported similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub id: String,

    /// Similarity score as reported by the index (descending order)
    pub score: f32,

    pub metadata: serde_json::Value,
}

/// Summary statistics for an index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Configured vector dimension
    pub dimension: usize,

    /// Total vectors across all namespaces
    pub total_vector_count: u64,

    /// Vector count per namespace
    pub namespaces: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vector_record_roundtrip() {
        let record = VectorRecord {
            id: "ferc_4010_0".to_string(),
            values: vec![0.1, 0.2, 0.3],
            metadata: json!({"data_type": "ferc_trial_balance", "account_number": 4010}),
        };

        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: VectorRecord = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.id, record.id);
        assert_eq!(decoded.values, record.values);
        assert_eq!(decoded.metadata["data_type"], "ferc_trial_balance");
    }
}
