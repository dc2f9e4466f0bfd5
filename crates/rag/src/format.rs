//! Record formatting for ingestion.
//!
//! Converts a typed record into the canonical text string that gets
//! embedded, the metadata mapping stored next to the vector, and a stable
//! unique identifier.
//!
//! Formatting is deterministic: the same record and sequence index always
//! produce identical text, metadata, and id.

use crate::record::{DocumentChunk, Record};
use gridfin_core::AppResult;
use serde_json::json;

/// A record prepared for embedding and upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRecord {
    /// `{type_prefix}_{natural_key}_{sequence_index}`
    pub id: String,

    /// Canonical text rendering, the input to the embedding model
    pub text: String,

    /// Flat metadata mapping with a `data_type` discriminator
    pub metadata: serde_json::Value,
}

/// Format a record at position `sequence` of its source batch.
///
/// The sequence index keeps ids unique within an ingestion run even when
/// natural keys repeat across rows. Caveat: a rerun that reorders rows or
/// changes the batch contents produces different ids for the same records,
/// so idempotence only holds for identical reruns.
pub fn format_record(record: &Record, sequence: usize) -> AppResult<FormattedRecord> {
    let metadata = serde_json::to_value(record)?;

    let (id, text) = match record {
        Record::TrialBalance(e) => (
            format!("ferc_{}_{}", e.account_number, sequence),
            format!(
                "account number: {}, description: {}, debit: {}, credit: {}, period: {}, entity: {}",
                e.account_number, e.account_description, e.debit, e.credit, e.period, e.entity
            ),
        ),
        Record::ProForma(m) => (
            format!("proforma_{}_{}", m.metric_id, sequence),
            format!(
                "metric id: {}, name: {}, value: {}, period: {}, assumptions: {}",
                m.metric_id, m.metric_name, m.value, m.period, m.assumptions
            ),
        ),
        Record::JuniorLienBond(b) => (
            format!("debt_{}_{}", b.bond_id, sequence),
            format!(
                "bond id: {}, issuer: {}, principal amount: {}, interest rate: {}, maturity date: {}, lien position: {}",
                b.bond_id,
                b.issuer,
                b.principal_amount,
                b.interest_rate,
                b.maturity_date.format("%Y-%m-%d"),
                b.lien_position
            ),
        ),
        Record::MetricDefinition(d) => (
            format!("metric_{}_{}", d.metric_name.replace(' ', "_"), sequence),
            format!(
                "metric name: {}, formula: {}, description: {}, components: {}",
                d.metric_name, d.formula, d.description, d.components
            ),
        ),
    };

    Ok(FormattedRecord { id, text, metadata })
}

/// Format a free-text document chunk.
///
/// The chunk text itself is both the embedded string and the stored
/// rendering, so the composer can emit it verbatim at query time.
pub fn format_chunk(chunk: &DocumentChunk) -> FormattedRecord {
    FormattedRecord {
        id: format!("chunk_{}_{}", chunk.document_id, chunk.sequence),
        text: chunk.text.clone(),
        metadata: json!({
            "data_type": "chunk",
            "document_id": chunk.document_id,
            "sequence": chunk.sequence,
            "text": chunk.text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::*;
    use chrono::NaiveDate;

    fn trial_balance() -> Record {
        Record::TrialBalance(TrialBalanceEntry {
            account_number: 4010,
            account_description: "Electric Sales Revenue".to_string(),
            debit: 0.0,
            credit: 125000.5,
            period: "2023-Q1".to_string(),
            entity: "Metro Electric".to_string(),
        })
    }

    #[test]
    fn test_trial_balance_template() {
        let formatted = format_record(&trial_balance(), 3).unwrap();

        assert_eq!(formatted.id, "ferc_4010_3");
        assert_eq!(
            formatted.text,
            "account number: 4010, description: Electric Sales Revenue, debit: 0, \
             credit: 125000.5, period: 2023-Q1, entity: Metro Electric"
        );
        assert_eq!(formatted.metadata["data_type"], "ferc_trial_balance");
        assert_eq!(formatted.metadata["entity"], "Metro Electric");
    }

    #[test]
    fn test_bond_template_iso_date() {
        let record = Record::JuniorLienBond(JuniorLienBond {
            bond_id: 12,
            issuer: "Metro Electric".to_string(),
            principal_amount: 5000000.0,
            interest_rate: 4.25,
            maturity_date: NaiveDate::from_ymd_opt(2035, 6, 30).unwrap(),
            lien_position: "Junior".to_string(),
        });

        let formatted = format_record(&record, 0).unwrap();
        assert_eq!(formatted.id, "debt_12_0");
        assert!(formatted.text.contains("maturity date: 2035-06-30"));
        assert!(formatted.text.contains("lien position: Junior"));
    }

    #[test]
    fn test_metric_definition_id_replaces_spaces() {
        let record = Record::MetricDefinition(MetricDefinition {
            metric_name: "Gross Margin".to_string(),
            formula: "(Revenue - COGS) / Revenue".to_string(),
            description: "Profitability after direct costs".to_string(),
            components: "Revenue, COGS".to_string(),
        });

        let formatted = format_record(&record, 5).unwrap();
        assert_eq!(formatted.id, "metric_Gross_Margin_5");
        assert!(formatted.text.starts_with("metric name: Gross Margin, formula:"));
    }

    #[test]
    fn test_format_is_deterministic() {
        let record = trial_balance();
        let first = format_record(&record, 2).unwrap();
        let second = format_record(&record, 2).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_sequence_index_distinguishes_duplicate_keys() {
        let record = trial_balance();
        let a = format_record(&record, 0).unwrap();
        let b = format_record(&record, 1).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn test_format_chunk() {
        let chunk = DocumentChunk {
            document_id: "ppa-2023".to_string(),
            sequence: 4,
            text: "The offtaker shall purchase all delivered energy.".to_string(),
        };

        let formatted = format_chunk(&chunk);
        assert_eq!(formatted.id, "chunk_ppa-2023_4");
        assert_eq!(formatted.metadata["data_type"], "chunk");
        assert_eq!(formatted.metadata["sequence"], 4);
        assert_eq!(formatted.text, chunk.text);
    }
}
