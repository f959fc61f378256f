//! @ai:module:intent Agent execution behind a uniform async contract
//! @ai:module:layer infrastructure
//! @ai:module:public_api AgentRunnerTrait, CallableAgentRunner, NoopAgentRunner, HttpAgentRunner, AnyRunner, build_runner

pub mod callable;
pub mod http;
pub mod mode;
pub mod types;

pub use callable::{
    gold_runner, AgentFn, AgentRunnerTrait, CallableAgentRunner, MetadataHook, NoopAgentRunner,
    RunContext,
};
pub use http::HttpAgentRunner;
pub use mode::{build_runner, AgentMode, AnyRunner};
pub use types::{AgentOutput, AgentResponse, AgentRunMetadata};
