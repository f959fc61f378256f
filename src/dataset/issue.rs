//! @ai:module:intent Structured issues raised while loading and joining evaluation data
//! @ai:module:layer domain
//! @ai:module:public_api Issue, IssueType, IssueSeverity
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// @ai:intent Classification of evaluation issues for CI reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    SchemaFailure,
    JoinMismatch,
    /// Reserved for baseline comparisons; the pipeline never emits it
    MetricRegression,
}

impl IssueType {
    /// @ai:intent Convert issue type to its wire value
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::SchemaFailure => "schema_failure",
            IssueType::JoinMismatch => "join_mismatch",
            IssueType::MetricRegression => "metric_regression",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueSeverity {
    #[default]
    Error,
    Warning,
    Info,
}

/// @ai:intent A data-quality problem collected alongside successful output
///            Issues never halt processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_type: IssueType,
    pub ticket_id: Option<String>,
    pub details: String,
    pub metrics: Option<Map<String, Value>>,
    #[serde(default)]
    pub severity: IssueSeverity,
}

impl Issue {
    /// @ai:intent Create an issue with default severity and no metrics payload
    /// @ai:effects pure
    pub fn new(issue_type: IssueType, details: impl Into<String>, ticket_id: Option<String>) -> Self {
        Self {
            issue_type,
            ticket_id,
            details: details.into(),
            metrics: None,
            severity: IssueSeverity::default(),
        }
    }

    /// @ai:intent Malformed JSON, wrong root shape, or failed field validation
    /// @ai:effects pure
    pub fn schema_failure(details: impl Into<String>, ticket_id: Option<String>) -> Self {
        Self::new(IssueType::SchemaFailure, details, ticket_id)
    }

    /// @ai:intent Duplicate identifier or identifier present on one side of the join
    /// @ai:effects pure
    pub fn join_mismatch(details: impl Into<String>, ticket_id: Option<String>) -> Self {
        Self::new(IssueType::JoinMismatch, details, ticket_id)
    }

    pub fn with_severity(mut self, severity: IssueSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_metrics(mut self, metrics: Map<String, Value>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.issue_type,
            self.ticket_id.as_deref().unwrap_or("-"),
            self.details
        )
    }
}
