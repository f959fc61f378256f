//! @ai:module:intent Adapt plain agent callables to the runner contract
//! @ai:module:layer application
//! @ai:module:public_api AgentRunnerTrait, CallableAgentRunner, NoopAgentRunner, gold_runner, RunContext
//! @ai:module:stateless true

use crate::dataset::Example;
use crate::error::{EvalError, Result};
use crate::runner::types::{AgentOutput, AgentResponse, AgentRunMetadata};
use crate::schema::{TicketResult, TicketTask};
use std::collections::HashMap;
use std::time::Instant;

/// @ai:intent Single-method contract for anything that can triage a ticket
#[allow(async_fn_in_trait)]
pub trait AgentRunnerTrait: Send + Sync {
    /// @ai:intent Run the agent on one task and return its answer with metadata
    async fn run(&self, task: &TicketTask) -> Result<AgentResponse>;
}

/// @ai:intent Inputs handed to a metadata hook after a bare-result call
pub struct RunContext<'a> {
    pub task: &'a TicketTask,
    pub result: &'a TicketResult,
    pub elapsed_ms: f64,
}

pub type MetadataHook = Box<dyn Fn(RunContext<'_>) -> AgentRunMetadata + Send + Sync>;

/// Boxed agent callable, used where the concrete closure type cannot be named
pub type AgentFn = Box<dyn Fn(&TicketTask) -> Result<AgentOutput> + Send + Sync>;

/// @ai:intent Turn an agent output into a full response
///            Reported latency wins; otherwise the measured time fills it in
/// @ai:effects pure
pub(crate) fn complete_response(
    task: &TicketTask,
    output: AgentOutput,
    elapsed_ms: f64,
    hook: Option<&MetadataHook>,
) -> AgentResponse {
    match output {
        AgentOutput::Response(mut response) => {
            if response.metadata.latency_ms.is_none() {
                response.metadata.latency_ms = Some(elapsed_ms);
            }
            response
        }
        AgentOutput::Result(result) => {
            let metadata = match hook {
                Some(hook) => hook(RunContext {
                    task,
                    result: &result,
                    elapsed_ms,
                }),
                None => AgentRunMetadata::with_latency(elapsed_ms),
            };
            AgentResponse::new(result, metadata)
        }
    }
}

/// @ai:intent Runner wrapping a synchronous agent callable with wall-clock timing
pub struct CallableAgentRunner<F> {
    agent: F,
    metadata_hook: Option<MetadataHook>,
}

impl<F> CallableAgentRunner<F>
where
    F: Fn(&TicketTask) -> Result<AgentOutput> + Send + Sync,
{
    /// @ai:intent Create a runner around an agent callable
    /// @ai:effects pure
    pub fn new(agent: F) -> Self {
        Self {
            agent,
            metadata_hook: None,
        }
    }

    /// @ai:intent Build metadata for bare results with a custom hook instead of latency only
    /// @ai:effects pure
    pub fn with_metadata_hook(
        mut self,
        hook: impl Fn(RunContext<'_>) -> AgentRunMetadata + Send + Sync + 'static,
    ) -> Self {
        self.metadata_hook = Some(Box::new(hook));
        self
    }
}

impl<F> AgentRunnerTrait for CallableAgentRunner<F>
where
    F: Fn(&TicketTask) -> Result<AgentOutput> + Send + Sync,
{
    async fn run(&self, task: &TicketTask) -> Result<AgentResponse> {
        let start = Instant::now();
        let output = (self.agent)(task)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(complete_response(
            task,
            output,
            elapsed_ms,
            self.metadata_hook.as_ref(),
        ))
    }
}

/// @ai:intent Placeholder runner that refuses to evaluate
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAgentRunner;

impl NoopAgentRunner {
    pub fn new() -> Self {
        Self
    }
}

impl AgentRunnerTrait for NoopAgentRunner {
    async fn run(&self, _task: &TicketTask) -> Result<AgentResponse> {
        Err(EvalError::RunnerNotConfigured)
    }
}

/// @ai:intent Runner that answers every task with its gold result
///            Useful to check the harness end to end; reports zero latency
/// @ai:effects pure
pub fn gold_runner(examples: &[Example]) -> CallableAgentRunner<AgentFn> {
    let gold: HashMap<String, TicketResult> = examples
        .iter()
        .map(|example| (example.ticket_id().to_string(), example.gold.clone()))
        .collect();

    let agent: AgentFn = Box::new(move |task: &TicketTask| -> Result<AgentOutput> {
        let result = gold
            .get(&task.ticket_id)
            .cloned()
            .ok_or_else(|| EvalError::MissingGold(task.ticket_id.clone()))?;

        Ok(AgentResponse::new(result, AgentRunMetadata::with_latency(0.0)).into())
    });

    CallableAgentRunner::new(agent)
}
