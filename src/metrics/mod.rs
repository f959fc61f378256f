//! @ai:module:intent Metric protocol, baseline scorers and run aggregation
//! @ai:module:layer application
//! @ai:module:public_api Metric, MetricResult, EvalResult, AggregateSummary, MetricsAggregator, baseline_metrics

pub mod aggregator;
pub mod scorers;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use scorers::{
    baseline_metrics, CategoricalAccuracyMetric, CostAggregator, Metric, NextStepMatcher,
    SchemaValidityMetric,
};
pub use types::{AggregateSummary, EvalResult, MetricDetails, MetricEntry, MetricResult, MetricValue};
