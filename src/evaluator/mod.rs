//! @ai:module:intent Drive the agent runner and metrics over assembled examples
//! @ai:module:layer application
//! @ai:module:public_api Evaluator
//! @ai:module:stateless true

use crate::dataset::Example;
use crate::error::Result;
use crate::metrics::{baseline_metrics, EvalResult, Metric, MetricEntry};
use crate::runner::AgentRunnerTrait;
use std::collections::BTreeMap;

/// @ai:intent Sequential evaluator: one runner call and one pass of every metric per example
pub struct Evaluator {
    metrics: Vec<Box<dyn Metric>>,
    limit: Option<usize>,
}

impl Evaluator {
    /// @ai:intent Create an evaluator scoring with the given metrics, in order
    /// @ai:effects pure
    pub fn new(metrics: Vec<Box<dyn Metric>>) -> Self {
        Self {
            metrics,
            limit: None,
        }
    }

    /// @ai:intent Stop after `limit` examples; `None` processes everything
    /// @ai:effects pure
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// @ai:intent Run the agent on one example and score its answer
    /// @ai:effects network
    pub async fn evaluate_example<R: AgentRunnerTrait>(
        &self,
        example: &Example,
        runner: &R,
    ) -> Result<EvalResult> {
        let response = runner.run(&example.task).await?;

        let mut metrics = BTreeMap::new();
        for metric in &self.metrics {
            let scored = metric.compute(example, &response);
            tracing::debug!("{} {} = {}", example.ticket_id(), scored.name, scored.value);

            if let Some(details) = scored.details.filter(|d| !d.is_empty()) {
                metrics.insert(format!("{}_details", scored.name), MetricEntry::Details(details));
            }
            metrics.insert(scored.name, MetricEntry::Value(scored.value));
        }

        Ok(EvalResult {
            ticket_id: example.ticket_id().to_string(),
            output: response.result,
            metrics,
            metadata: response.metadata,
        })
    }

    /// @ai:intent Evaluate examples in order until the limit is reached
    /// @ai:post result order matches input order; runner errors abort the run
    /// @ai:effects network
    pub async fn evaluate_all<R: AgentRunnerTrait>(
        &self,
        examples: &[Example],
        runner: &R,
    ) -> Result<Vec<EvalResult>> {
        let total = self
            .limit
            .map(|limit| limit.min(examples.len()))
            .unwrap_or(examples.len());
        let mut results = Vec::with_capacity(total);

        for (idx, example) in examples.iter().enumerate() {
            if self.limit.is_some_and(|limit| idx >= limit) {
                tracing::info!("Reached limit of {} examples", idx);
                break;
            }

            tracing::info!("[{}/{}] Evaluating {}", idx + 1, total, example.ticket_id());
            results.push(self.evaluate_example(example, runner).await?);
        }

        Ok(results)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(baseline_metrics())
    }
}
