//! Intent routing.
//!
//! A narrow first-stage classifier that spots "how is <metric> calculated"
//! questions and short-circuits them to the metric-definition lookup,
//! bypassing retrieval. Everything else falls through to full retrieval.
//!
//! The pattern is intentionally narrow: a false negative just costs one
//! retrieval round-trip, while a false positive would mis-route a genuine
//! analytical question. This is not a general NLU component.

use regex::Regex;
use std::sync::OnceLock;

static CALC_EXPLANATION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn calc_explanation_pattern() -> &'static Regex {
    CALC_EXPLANATION_PATTERN.get_or_init(|| {
        // The article is optional: "How is Gross Margin calculated?" and
        // "How was the debt service coverage ratio calculated?" both match.
        Regex::new(r"(?i)how\s+(?:is|was)\s+(?:the\s+)?([\w\s]+?)\s+calculated")
            .expect("calc explanation pattern is valid")
    })
}

/// Classification of an incoming query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    /// The query asks how a named metric is calculated; answer from the
    /// metric-definition store directly.
    ExplainMetric(String),

    /// No shortcut applies; run the full retrieval pipeline.
    Retrieve,
}

/// Classify a query. Pure and side-effect free.
pub fn route(query: &str) -> QueryIntent {
    match calc_explanation_pattern().captures(query) {
        Some(captures) => QueryIntent::ExplainMetric(captures[1].trim().to_string()),
        None => QueryIntent::Retrieve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_without_article() {
        assert_eq!(
            route("How is Gross Margin calculated?"),
            QueryIntent::ExplainMetric("Gross Margin".to_string())
        );
    }

    #[test]
    fn test_explain_with_article() {
        assert_eq!(
            route("How is the debt service coverage ratio calculated?"),
            QueryIntent::ExplainMetric("debt service coverage ratio".to_string())
        );
    }

    #[test]
    fn test_past_tense() {
        assert_eq!(
            route("how was the Net Income calculated for 2023"),
            QueryIntent::ExplainMetric("Net Income".to_string())
        );
    }

    #[test]
    fn test_analytical_question_falls_through() {
        assert_eq!(route("What was revenue in Q1 2023?"), QueryIntent::Retrieve);
    }

    // The classifier prefers false negatives over false positives: askers
    // who phrase a calculation question differently still get a correct
    // (retrieval-based) answer, at the cost of a round-trip.
    #[test]
    fn test_narrow_pattern_tolerates_false_negatives() {
        assert_eq!(
            route("Explain the calculation of Gross Margin"),
            QueryIntent::Retrieve
        );
        assert_eq!(
            route("What formula is used for Gross Margin?"),
            QueryIntent::Retrieve
        );
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(
            route("how is   Operating  Ratio   calculated please"),
            QueryIntent::ExplainMetric("Operating  Ratio".to_string())
        );
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(route(""), QueryIntent::Retrieve);
    }
}
