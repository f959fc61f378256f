//! @ai:module:intent Define error types for the evaluation harness
//! @ai:module:layer domain
//! @ai:module:public_api EvalError, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Errors that abort an evaluation run
///            Data-quality problems are never errors; they become dataset issues
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Agent runner is not configured. Provide a concrete implementation before evaluation.")]
    RunnerNotConfigured,

    #[error("No gold label for ticket_id {0}")]
    MissingGold(String),

    #[error("Unsupported agent mode: {0}")]
    UnsupportedAgentMode(String),

    #[error("Agent mode '{mode}' requires {missing}")]
    IncompleteRunnerConfig { mode: String, missing: String },

    #[error("Agent call failed for ticket_id {ticket_id}: {message}")]
    Agent { ticket_id: String, message: String },

    #[error("Invalid agent settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
