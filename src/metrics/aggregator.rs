//! @ai:module:intent Reduce per-example results into a run summary
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::metrics::types::{AggregateSummary, EvalResult, MetricValue};

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Summarize a run's results
    fn summarize(&self, results: &[EvalResult]) -> AggregateSummary;
}

/// @ai:intent Mean and sum reducer over the baseline metric names
///            Missing or mistyped values count as zero rather than being skipped
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// Numeric score; booleans count 1/0
    fn numeric(result: &EvalResult, name: &str) -> f64 {
        result.metric(name).and_then(MetricValue::as_f64).unwrap_or(0.0)
    }

    /// Boolean score; anything that is not a boolean counts as false
    fn flag(result: &EvalResult, name: &str) -> f64 {
        match result.metric(name).and_then(MetricValue::as_bool) {
            Some(true) => 1.0,
            _ => 0.0,
        }
    }

    /// Cost is summed from numbers only
    fn cost(result: &EvalResult) -> f64 {
        match result.metric("usd_cost") {
            Some(MetricValue::Number(value)) => *value,
            _ => 0.0,
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Aggregate results into the run summary
    /// @ai:effects pure
    fn summarize(&self, results: &[EvalResult]) -> AggregateSummary {
        if results.is_empty() {
            return AggregateSummary::default();
        }

        AggregateSummary {
            total_examples: results.len(),
            categorical_accuracy: average(
                results.iter().map(|r| Self::numeric(r, "categorical_accuracy")),
            ),
            next_step_match_rate: average(results.iter().map(|r| Self::flag(r, "next_step_match"))),
            schema_valid_pct: average(results.iter().map(|r| Self::flag(r, "schema_valid"))),
            total_cost_usd: results.iter().map(Self::cost).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::MetricEntry;
    use crate::runner::AgentRunMetadata;
    use crate::schema::{TicketCategory, TicketResult, TicketSeverity};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn result_with(metrics: Vec<(&str, MetricValue)>) -> EvalResult {
        EvalResult {
            ticket_id: "TKT-1".to_string(),
            output: TicketResult {
                category: TicketCategory::Question,
                severity: TicketSeverity::Medium,
                next_step: "Reply with docs link".to_string(),
                confidence: 0.6,
            },
            metrics: metrics
                .into_iter()
                .map(|(name, value)| (name.to_string(), MetricEntry::Value(value)))
                .collect::<BTreeMap<_, _>>(),
            metadata: AgentRunMetadata::default(),
        }
    }

    #[test]
    fn test_empty_results_are_all_zero() {
        let summary = MetricsAggregator::new().summarize(&[]);
        assert_eq!(summary, AggregateSummary::default());
        assert_eq!(summary.total_examples, 0);
        assert_eq!(summary.total_cost_usd, 0.0);
    }

    #[test]
    fn test_costs_are_summed() {
        let results = vec![
            result_with(vec![("usd_cost", MetricValue::Number(0.25))]),
            result_with(vec![("usd_cost", MetricValue::Number(0.25))]),
        ];

        let summary = MetricsAggregator::new().summarize(&results);

        assert_eq!(summary.total_examples, 2);
        assert_eq!(summary.total_cost_usd, 0.5);
    }

    #[test]
    fn test_means_over_mixed_results() {
        let results = vec![
            result_with(vec![
                ("schema_valid", MetricValue::Flag(true)),
                ("categorical_accuracy", MetricValue::Number(1.0)),
                ("next_step_match", MetricValue::Flag(true)),
            ]),
            result_with(vec![
                ("schema_valid", MetricValue::Flag(true)),
                ("categorical_accuracy", MetricValue::Number(0.0)),
                ("next_step_match", MetricValue::Flag(true)),
            ]),
        ];

        let summary = MetricsAggregator::new().summarize(&results);

        assert_eq!(summary.categorical_accuracy, 0.5);
        assert_eq!(summary.next_step_match_rate, 1.0);
        assert_eq!(summary.schema_valid_pct, 1.0);
    }

    #[test]
    fn test_missing_and_mistyped_values_count_as_zero() {
        let results = vec![
            result_with(vec![
                ("schema_valid", MetricValue::Flag(true)),
                ("categorical_accuracy", MetricValue::Flag(true)),
                ("next_step_match", MetricValue::Flag(true)),
                ("usd_cost", MetricValue::Number(0.1)),
            ]),
            result_with(vec![
                ("schema_valid", MetricValue::Number(1.0)),
                ("categorical_accuracy", MetricValue::Text("n/a".to_string())),
                ("usd_cost", MetricValue::Text("free".to_string())),
            ]),
        ];

        let summary = MetricsAggregator::new().summarize(&results);

        assert_eq!(summary.categorical_accuracy, 0.5);
        assert_eq!(summary.next_step_match_rate, 0.5);
        assert_eq!(summary.schema_valid_pct, 0.5);
        assert_eq!(summary.total_cost_usd, 0.1);
    }
}
