//! @ai:module:intent Select and build the agent runner for a run
//! @ai:module:layer application
//! @ai:module:public_api AgentMode, AnyRunner, build_runner

use crate::config::AgentSettings;
use crate::dataset::Example;
use crate::error::{EvalError, Result};
use crate::runner::callable::{gold_runner, AgentFn, AgentRunnerTrait, CallableAgentRunner, NoopAgentRunner};
use crate::runner::http::HttpAgentRunner;
use crate::runner::types::AgentResponse;
use crate::schema::TicketTask;
use std::str::FromStr;

/// @ai:intent Which agent a run drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    /// Placeholder that fails on the first example
    Noop,
    /// Echo the gold labels
    Gold,
    /// Remote agent endpoint
    Http,
}

impl AgentMode {
    pub const ALL: [AgentMode; 3] = [AgentMode::Noop, AgentMode::Gold, AgentMode::Http];

    /// @ai:intent Convert mode to its configuration value
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Noop => "noop",
            AgentMode::Gold => "gold",
            AgentMode::Http => "http",
        }
    }
}

impl std::fmt::Display for AgentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentMode {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        AgentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| EvalError::UnsupportedAgentMode(s.to_string()))
    }
}

/// @ai:intent Closed set of runners the CLI can drive
pub enum AnyRunner {
    Noop(NoopAgentRunner),
    Callable(CallableAgentRunner<AgentFn>),
    Http(HttpAgentRunner),
}

impl AgentRunnerTrait for AnyRunner {
    async fn run(&self, task: &TicketTask) -> Result<AgentResponse> {
        match self {
            AnyRunner::Noop(runner) => runner.run(task).await,
            AnyRunner::Callable(runner) => runner.run(task).await,
            AnyRunner::Http(runner) => runner.run(task).await,
        }
    }
}

/// @ai:intent Build the runner for a mode
/// @ai:pre http mode needs both agent settings and an endpoint
/// @ai:effects pure
pub fn build_runner(
    mode: AgentMode,
    examples: &[Example],
    settings: Option<&AgentSettings>,
    endpoint: Option<&str>,
) -> Result<AnyRunner> {
    tracing::info!("Using agent mode '{}'", mode);

    match mode {
        AgentMode::Noop => Ok(AnyRunner::Noop(NoopAgentRunner::new())),
        AgentMode::Gold => Ok(AnyRunner::Callable(gold_runner(examples))),
        AgentMode::Http => {
            let endpoint = endpoint.ok_or_else(|| EvalError::IncompleteRunnerConfig {
                mode: mode.to_string(),
                missing: "an agent endpoint".to_string(),
            })?;
            let settings = settings.ok_or_else(|| EvalError::IncompleteRunnerConfig {
                mode: mode.to_string(),
                missing: "agent settings".to_string(),
            })?;
            Ok(AnyRunner::Http(HttpAgentRunner::new(endpoint, settings)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_settings_from_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_known_modes() {
        assert_eq!("noop".parse::<AgentMode>().unwrap(), AgentMode::Noop);
        assert_eq!("gold".parse::<AgentMode>().unwrap(), AgentMode::Gold);
        assert_eq!("http".parse::<AgentMode>().unwrap(), AgentMode::Http);
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = "replay".parse::<AgentMode>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported agent mode: replay");
    }

    #[test]
    fn test_http_requires_endpoint() {
        let settings = load_settings_from_str("[llm]\nmodel = \"m\"\n").unwrap();

        let result = build_runner(AgentMode::Http, &[], Some(&settings), None);

        assert!(matches!(
            result,
            Err(EvalError::IncompleteRunnerConfig { ref missing, .. }) if missing == "an agent endpoint"
        ));
    }

    #[test]
    fn test_http_requires_settings() {
        let result = build_runner(AgentMode::Http, &[], None, Some("http://localhost:9/triage"));
        assert!(matches!(result, Err(EvalError::IncompleteRunnerConfig { .. })));
    }

    #[tokio::test]
    async fn test_noop_mode_fails_on_run() {
        let runner = build_runner(AgentMode::Noop, &[], None, None).unwrap();

        let task = TicketTask {
            ticket_id: "TKT-1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            metadata: None,
        };

        assert!(matches!(runner.run(&task).await, Err(EvalError::RunnerNotConfigured)));
    }
}
