//! @ai:module:intent Data types for per-example scores and run summaries
//! @ai:module:layer domain
//! @ai:module:public_api MetricValue, MetricResult, MetricEntry, EvalResult, AggregateSummary
//! @ai:module:stateless true

use crate::runner::AgentRunMetadata;
use crate::schema::TicketResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// @ai:intent A scalar produced by a metric: boolean, number or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// @ai:intent Numeric view; booleans count as 1.0 and 0.0, text has none
    /// @ai:effects pure
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            MetricValue::Number(value) => Some(*value),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetricValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Flag(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Flag(flag) => write!(f, "{}", flag),
            MetricValue::Number(value) => write!(f, "{}", value),
            MetricValue::Text(text) => write!(f, "{}", text),
        }
    }
}

pub type MetricDetails = BTreeMap<String, MetricValue>;

/// @ai:intent Output of one metric on one example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub name: String,
    pub value: MetricValue,
    pub details: Option<MetricDetails>,
}

impl MetricResult {
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: MetricDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// @ai:intent One entry of an EvalResult metrics map: a score or a `<name>_details` sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricEntry {
    Value(MetricValue),
    Details(MetricDetails),
}

/// @ai:intent Scored outcome for one example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    pub ticket_id: String,
    pub output: TicketResult,
    pub metrics: BTreeMap<String, MetricEntry>,
    pub metadata: AgentRunMetadata,
}

impl EvalResult {
    /// @ai:intent Look up a metric score by name, ignoring detail sidecars
    /// @ai:effects pure
    pub fn metric(&self, name: &str) -> Option<&MetricValue> {
        match self.metrics.get(name)? {
            MetricEntry::Value(value) => Some(value),
            MetricEntry::Details(_) => None,
        }
    }

    /// @ai:intent Look up the detail sidecar for a metric
    /// @ai:effects pure
    pub fn details(&self, name: &str) -> Option<&MetricDetails> {
        match self.metrics.get(&format!("{}_details", name))? {
            MetricEntry::Details(details) => Some(details),
            MetricEntry::Value(_) => None,
        }
    }
}

/// @ai:intent Run-level statistics; all zero for an empty run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub total_examples: usize,
    pub categorical_accuracy: f64,
    pub next_step_match_rate: f64,
    pub schema_valid_pct: f64,
    pub total_cost_usd: f64,
}

impl AggregateSummary {
    /// @ai:intent CI gate on the share of schema-valid answers
    /// @ai:effects pure
    pub fn meets_schema_threshold(&self, threshold: f64) -> bool {
        self.schema_valid_pct >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_metric_entries_serialize_flat() {
        let mut details = MetricDetails::new();
        details.insert("category_match".to_string(), true.into());

        let mut metrics = BTreeMap::new();
        metrics.insert("categorical_accuracy".to_string(), MetricEntry::Value(1.0.into()));
        metrics.insert(
            "categorical_accuracy_details".to_string(),
            MetricEntry::Details(details),
        );
        metrics.insert("schema_valid".to_string(), MetricEntry::Value(true.into()));

        assert_eq!(
            serde_json::to_value(&metrics).unwrap(),
            json!({
                "categorical_accuracy": 1.0,
                "categorical_accuracy_details": {"category_match": true},
                "schema_valid": true
            })
        );
    }

    #[test]
    fn test_metric_entries_deserialize_by_shape() {
        let metrics: BTreeMap<String, MetricEntry> = serde_json::from_value(json!({
            "next_step_match": false,
            "next_step_match_details": {"normalized_gold": "call back"},
            "usd_cost": 0.25
        }))
        .unwrap();

        assert_eq!(metrics["next_step_match"], MetricEntry::Value(MetricValue::Flag(false)));
        assert_eq!(metrics["usd_cost"], MetricEntry::Value(MetricValue::Number(0.25)));
        assert!(matches!(metrics["next_step_match_details"], MetricEntry::Details(_)));
    }

    #[test]
    fn test_schema_threshold_gate() {
        let summary = AggregateSummary {
            total_examples: 20,
            schema_valid_pct: 0.95,
            ..Default::default()
        };

        assert!(summary.meets_schema_threshold(0.95));
        assert!(!summary.meets_schema_threshold(0.96));
        assert!(!AggregateSummary::default().meets_schema_threshold(0.95));
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(MetricValue::Flag(true).as_f64(), Some(1.0));
        assert_eq!(MetricValue::Number(0.5).as_f64(), Some(0.5));
        assert_eq!(MetricValue::Text("n/a".to_string()).as_f64(), None);
        assert_eq!(MetricValue::Number(1.0).as_bool(), None);
    }
}
