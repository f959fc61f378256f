//! @ai:module:intent Agent response and run metadata types
//! @ai:module:layer domain
//! @ai:module:public_api AgentRunMetadata, AgentResponse, AgentOutput
//! @ai:module:stateless true

use crate::schema::TicketResult;
use serde::{Deserialize, Serialize};

/// @ai:intent Operational measurements for one agent call
///            `None` means the value was not measured, never zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentRunMetadata {
    pub latency_ms: Option<f64>,
    pub tokens_in: Option<u64>,
    pub tokens_out: Option<u64>,
    pub usd_cost: Option<f64>,
    pub tool_calls: Option<u32>,
    pub retries: Option<u32>,
    pub cache_hit: Option<bool>,
    pub failure_reason: Option<String>,
}

impl AgentRunMetadata {
    /// @ai:intent Metadata carrying only a measured latency
    /// @ai:effects pure
    pub fn with_latency(latency_ms: f64) -> Self {
        Self {
            latency_ms: Some(latency_ms),
            ..Default::default()
        }
    }
}

/// @ai:intent The agent's structured answer paired with its run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub result: TicketResult,
    #[serde(default)]
    pub metadata: AgentRunMetadata,
}

impl AgentResponse {
    pub fn new(result: TicketResult, metadata: AgentRunMetadata) -> Self {
        Self { result, metadata }
    }
}

/// @ai:intent What an agent callable may return: a bare answer or a full response
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    Result(TicketResult),
    Response(AgentResponse),
}

impl From<TicketResult> for AgentOutput {
    fn from(result: TicketResult) -> Self {
        AgentOutput::Result(result)
    }
}

impl From<AgentResponse> for AgentOutput {
    fn from(response: AgentResponse) -> Self {
        AgentOutput::Response(response)
    }
}
