//! Financial record types.
//!
//! Each record variant maps to one source dataset. The serde representation
//! is internally tagged on `data_type`, so serializing a record yields
//! exactly the flat metadata mapping stored alongside its embedding, and
//! the tag doubles as the discriminator the context composer dispatches on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a FERC trial balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceEntry {
    pub account_number: i64,
    pub account_description: String,
    pub debit: f64,
    pub credit: f64,
    pub period: String,
    pub entity: String,
}

/// One pro-forma metric observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProFormaMetric {
    pub metric_id: i64,
    pub metric_name: String,
    pub value: f64,
    pub period: String,
    pub assumptions: String,
}

/// One junior-lien bond record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuniorLienBond {
    pub bond_id: i64,
    pub issuer: String,
    pub principal_amount: f64,
    pub interest_rate: f64,
    /// Serialized as an ISO 8601 date (YYYY-MM-DD)
    pub maturity_date: NaiveDate,
    pub lien_position: String,
}

/// How a named financial metric is calculated.
///
/// `metric_name` is the unique lookup key for the calculation-explanation
/// shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub metric_name: String,
    pub formula: String,
    pub description: String,
    pub components: String,
}

/// A typed financial record, tagged with its source dataset.
///
/// Records are immutable once ingested; changing one means re-ingesting it,
/// and the deterministic id makes that an overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_type")]
pub enum Record {
    #[serde(rename = "ferc_trial_balance")]
    TrialBalance(TrialBalanceEntry),

    #[serde(rename = "proforma")]
    ProForma(ProFormaMetric),

    #[serde(rename = "debt_junior_lien_bonds")]
    JuniorLienBond(JuniorLienBond),

    #[serde(rename = "metric_definition")]
    MetricDefinition(MetricDefinition),
}

impl Record {
    /// The `data_type` discriminator stored in vector metadata.
    pub fn data_type(&self) -> &'static str {
        match self {
            Record::TrialBalance(_) => "ferc_trial_balance",
            Record::ProForma(_) => "proforma",
            Record::JuniorLienBond(_) => "debt_junior_lien_bonds",
            Record::MetricDefinition(_) => "metric_definition",
        }
    }
}

/// A bounded-length segment of a long free-text document.
///
/// Chunks from the same source share `document_id`; `sequence` is the
/// chunk's position within the document. Each chunk is independently
/// embeddable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub document_id: String,
    pub sequence: usize,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metadata_carries_data_type() {
        let record = Record::ProForma(ProFormaMetric {
            metric_id: 7,
            metric_name: "Gross Margin".to_string(),
            value: 0.42,
            period: "Q1 2023".to_string(),
            assumptions: "baseline".to_string(),
        });

        let metadata = serde_json::to_value(&record).unwrap();
        assert_eq!(metadata["data_type"], "proforma");
        assert_eq!(metadata["metric_id"], 7);
        assert_eq!(metadata["metric_name"], "Gross Margin");
    }

    #[test]
    fn test_maturity_date_is_iso_8601() {
        let record = Record::JuniorLienBond(JuniorLienBond {
            bond_id: 12,
            issuer: "Metro Electric".to_string(),
            principal_amount: 5_000_000.0,
            interest_rate: 4.25,
            maturity_date: NaiveDate::from_ymd_opt(2035, 6, 30).unwrap(),
            lien_position: "Junior".to_string(),
        });

        let metadata = serde_json::to_value(&record).unwrap();
        assert_eq!(metadata["maturity_date"], "2035-06-30");
    }

    #[test]
    fn test_tagged_deserialization() {
        let raw = r#"{
            "data_type": "ferc_trial_balance",
            "account_number": 4010,
            "account_description": "Electric Sales Revenue",
            "debit": 0.0,
            "credit": 125000.5,
            "period": "2023-Q1",
            "entity": "Metro Electric"
        }"#;

        let record: Record = serde_json::from_str(raw).unwrap();
        match record {
            Record::TrialBalance(entry) => {
                assert_eq!(entry.account_number, 4010);
                assert_eq!(entry.credit, 125000.5);
            }
            other => panic!("Unexpected variant: {:?}", other),
        }
    }
}
