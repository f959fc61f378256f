//! @ai:module:intent Baseline metrics comparing an agent answer with the gold label
//! @ai:module:layer domain
//! @ai:module:public_api Metric, SchemaValidityMetric, CategoricalAccuracyMetric, NextStepMatcher, CostAggregator, baseline_metrics
//! @ai:module:stateless true

use crate::dataset::Example;
use crate::metrics::types::{MetricDetails, MetricResult};
use crate::runner::AgentResponse;

/// @ai:intent Named, pure scoring function over one example
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;

    /// @ai:intent Score one agent response against its example
    /// @ai:effects pure
    fn compute(&self, example: &Example, response: &AgentResponse) -> MetricResult;
}

/// @ai:intent True when the agent answer still satisfies the result schema
pub struct SchemaValidityMetric;

impl Metric for SchemaValidityMetric {
    fn name(&self) -> &str {
        "schema_valid"
    }

    fn compute(&self, _example: &Example, response: &AgentResponse) -> MetricResult {
        let valid = match response.result.check() {
            Ok(()) => true,
            Err(errors) => {
                tracing::debug!("Schema check failed: {}", errors);
                false
            }
        };
        MetricResult::new(self.name(), valid)
    }
}

/// @ai:intent 1.0 only when category and severity both match
pub struct CategoricalAccuracyMetric;

impl Metric for CategoricalAccuracyMetric {
    fn name(&self) -> &str {
        "categorical_accuracy"
    }

    fn compute(&self, example: &Example, response: &AgentResponse) -> MetricResult {
        let category_match = example.gold.category == response.result.category;
        let severity_match = example.gold.severity == response.result.severity;
        let score = if category_match && severity_match { 1.0 } else { 0.0 };

        let mut details = MetricDetails::new();
        details.insert("category_match".to_string(), category_match.into());
        details.insert("severity_match".to_string(), severity_match.into());

        MetricResult::new(self.name(), score).with_details(details)
    }
}

/// @ai:intent Next-step equality after trimming and case folding
pub struct NextStepMatcher;

impl NextStepMatcher {
    fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }
}

impl Metric for NextStepMatcher {
    fn name(&self) -> &str {
        "next_step_match"
    }

    fn compute(&self, example: &Example, response: &AgentResponse) -> MetricResult {
        let gold = Self::normalize(&example.gold.next_step);
        let pred = Self::normalize(&response.result.next_step);
        let matched = gold == pred;

        let mut details = MetricDetails::new();
        details.insert("normalized_gold".to_string(), gold.into());
        details.insert("normalized_pred".to_string(), pred.into());

        MetricResult::new(self.name(), matched).with_details(details)
    }
}

/// Reported monetary cost; 0.0 when the runner did not measure it
pub struct CostAggregator;

impl Metric for CostAggregator {
    fn name(&self) -> &str {
        "usd_cost"
    }

    fn compute(&self, _example: &Example, response: &AgentResponse) -> MetricResult {
        MetricResult::new(self.name(), response.metadata.usd_cost.unwrap_or(0.0))
    }
}

/// @ai:intent Default metric set, in scoring order
/// @ai:effects pure
pub fn baseline_metrics() -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(SchemaValidityMetric),
        Box::new(CategoricalAccuracyMetric),
        Box::new(NextStepMatcher),
        Box::new(CostAggregator),
    ]
}
