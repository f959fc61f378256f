//! @ai:module:intent Ticket triage agent evaluation library
//! @ai:module:layer application
//! @ai:module:public_api config, dataset, error, evaluator, metrics, report, runner, schema

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod schema;

pub use config::{AgentSettings, EvalConfig, SettingsCache};
pub use dataset::{DatasetLoadResult, DatasetLoader, Example, Issue, IssueType};
pub use error::{EvalError, Result};
pub use evaluator::Evaluator;
pub use metrics::{AggregateSummary, EvalResult, Metric, MetricsAggregator};
pub use report::ReportGenerator;
pub use runner::{AgentMode, AgentResponse, AgentRunMetadata, AgentRunnerTrait, CallableAgentRunner};
pub use schema::{TicketResult, TicketTask};
