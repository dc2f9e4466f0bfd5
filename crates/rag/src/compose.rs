//! Context composition.
//!
//! Renders retrieved matches' metadata back into per-type text lines, in
//! result order, concatenated into the context block the language model
//! sees. A match with an unknown `data_type` is logged and skipped rather
//! than silently dropped.

use gridfin_index::ScoredMatch;
use serde_json::Value;

fn field(metadata: &Value, key: &str) -> String {
    match metadata.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Render one match as a context line, dispatching on `data_type`.
///
/// Returns `None` for an unknown or missing discriminator.
fn render_line(metadata: &Value) -> Option<String> {
    let data_type = metadata.get("data_type")?.as_str()?;

    let line = match data_type {
        "ferc_trial_balance" => format!(
            "Account Number: {}, Description: {}, Debit: {}, Credit: {}, Period: {}, Entity: {}",
            field(metadata, "account_number"),
            field(metadata, "account_description"),
            field(metadata, "debit"),
            field(metadata, "credit"),
            field(metadata, "period"),
            field(metadata, "entity"),
        ),
        "proforma" => format!(
            "Metric ID: {}, Name: {}, Value: {}, Period: {}, Assumptions: {}",
            field(metadata, "metric_id"),
            field(metadata, "metric_name"),
            field(metadata, "value"),
            field(metadata, "period"),
            field(metadata, "assumptions"),
        ),
        "debt_junior_lien_bonds" => format!(
            "Bond ID: {}, Issuer: {}, Principal Amount: {}, Interest Rate: {}, Maturity Date: {}, Lien Position: {}",
            field(metadata, "bond_id"),
            field(metadata, "issuer"),
            field(metadata, "principal_amount"),
            field(metadata, "interest_rate"),
            field(metadata, "maturity_date"),
            field(metadata, "lien_position"),
        ),
        "metric_definition" => format!(
            "Metric Name: {}, Formula: {}, Description: {}, Components: {}",
            field(metadata, "metric_name"),
            field(metadata, "formula"),
            field(metadata, "description"),
            field(metadata, "components"),
        ),
        "chunk" => field(metadata, "text"),
        _ => return None,
    };

    Some(line)
}

/// Compose the context block from retrieved matches.
///
/// One newline-terminated line per match, in the given (descending
/// similarity) order. An empty result set composes to an empty string —
/// callers treat that as "no context" and skip the language model.
pub fn compose_context(matches: &[ScoredMatch]) -> String {
    let mut context = String::new();
    let mut skipped = 0usize;

    for m in matches {
        match render_line(&m.metadata) {
            Some(line) => {
                context.push_str(&line);
                context.push('\n');
            }
            None => {
                skipped += 1;
                tracing::warn!(
                    id = %m.id,
                    data_type = %field(&m.metadata, "data_type"),
                    "Skipping match with unsupported data_type"
                );
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Matches dropped from context");
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scored(score: f32, metadata: Value) -> ScoredMatch {
        ScoredMatch {
            id: format!("m{}", (score * 100.0) as u32),
            score,
            metadata,
        }
    }

    #[test]
    fn test_empty_results_compose_to_empty_string() {
        assert_eq!(compose_context(&[]), "");
    }

    #[test]
    fn test_one_line_per_variant_in_result_order() {
        let matches = vec![
            scored(
                0.9,
                json!({
                    "data_type": "ferc_trial_balance",
                    "account_number": 4010,
                    "account_description": "Electric Sales Revenue",
                    "debit": 0.0,
                    "credit": 125000.5,
                    "period": "2023-Q1",
                    "entity": "Metro Electric",
                }),
            ),
            scored(
                0.8,
                json!({
                    "data_type": "proforma",
                    "metric_id": 1,
                    "metric_name": "Gross Margin",
                    "value": 0.42,
                    "period": "2023-Q1",
                    "assumptions": "baseline demand",
                }),
            ),
            scored(
                0.7,
                json!({
                    "data_type": "debt_junior_lien_bonds",
                    "bond_id": 12,
                    "issuer": "Metro Electric",
                    "principal_amount": 5000000.0,
                    "interest_rate": 4.25,
                    "maturity_date": "2035-06-30",
                    "lien_position": "Junior",
                }),
            ),
            scored(
                0.6,
                json!({
                    "data_type": "metric_definition",
                    "metric_name": "Gross Margin",
                    "formula": "(Revenue - COGS) / Revenue",
                    "description": "Profitability after direct costs",
                    "components": "Revenue, COGS",
                }),
            ),
        ];

        let context = compose_context(&matches);
        let lines: Vec<&str> = context.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Account Number: 4010"));
        assert!(lines[1].starts_with("Metric ID: 1"));
        assert!(lines[2].starts_with("Bond ID: 12"));
        assert!(lines[3].starts_with("Metric Name: Gross Margin"));
        assert!(context.ends_with('\n'));
    }

    #[test]
    fn test_trial_balance_line_format() {
        let matches = vec![scored(
            0.9,
            json!({
                "data_type": "ferc_trial_balance",
                "account_number": 4010,
                "account_description": "Electric Sales Revenue",
                "debit": 0.0,
                "credit": 125000.5,
                "period": "2023-Q1",
                "entity": "Metro Electric",
            }),
        )];

        assert_eq!(
            compose_context(&matches),
            "Account Number: 4010, Description: Electric Sales Revenue, Debit: 0.0, \
             Credit: 125000.5, Period: 2023-Q1, Entity: Metro Electric\n"
        );
    }

    #[test]
    fn test_chunk_renders_stored_text() {
        let matches = vec![scored(
            0.5,
            json!({
                "data_type": "chunk",
                "document_id": "ppa-2023",
                "sequence": 0,
                "text": "The offtaker shall purchase all delivered energy.",
            }),
        )];

        assert_eq!(
            compose_context(&matches),
            "The offtaker shall purchase all delivered energy.\n"
        );
    }

    #[test]
    fn test_unknown_data_type_is_skipped() {
        let matches = vec![
            scored(0.9, json!({"data_type": "mystery", "x": 1})),
            scored(
                0.8,
                json!({
                    "data_type": "proforma",
                    "metric_id": 1,
                    "metric_name": "Gross Margin",
                    "value": 0.42,
                    "period": "2023-Q1",
                    "assumptions": "baseline",
                }),
            ),
        ];

        let context = compose_context(&matches);
        assert_eq!(context.lines().count(), 1);
        assert!(context.starts_with("Metric ID:"));
    }

    #[test]
    fn test_missing_data_type_is_skipped() {
        let matches = vec![scored(0.9, json!({"text": "orphan"}))];
        assert_eq!(compose_context(&matches), "");
    }
}
