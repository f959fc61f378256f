//! @ai:module:intent Agent settings: LLM parameters, runtime limits and tool bindings
//! @ai:module:layer infrastructure
//! @ai:module:public_api AgentSettings, AgentConfigError, SettingsCache, load_settings
//! @ai:module:stateless false

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location for the agent settings file
pub const DEFAULT_AGENT_CONFIG_PATH: &str = "config/agent.toml";

#[derive(Error, Debug)]
pub enum AgentConfigError {
    #[error("Agent configuration not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read agent configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse agent configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Agent configuration validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// @ai:intent Root agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSettings {
    pub llm: LlmSettings,
    #[serde(default)]
    pub runtime: RuntimeLimits,
    #[serde(default)]
    pub tooling: ToolingSettings,
}

/// @ai:intent Model selection and sampling parameters sent with each agent call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmSettings {
    pub model: String,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeLimits {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
    #[serde(default = "default_tool_budget")]
    pub tool_budget: u32,
    #[serde(default = "default_idempotency_prefix")]
    pub idempotency_prefix: String,
}

/// @ai:intent Import target and parameters for one agent tool
///            Unknown keys are kept in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub target: String,
    #[serde(default)]
    pub params: toml::Table,
    #[serde(flatten)]
    pub extra: toml::Table,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retriever: Option<ToolSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ToolSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<ToolSpec>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Default for RuntimeLimits {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            tool_budget: default_tool_budget(),
            idempotency_prefix: default_idempotency_prefix(),
        }
    }
}

fn default_top_p() -> f64 {
    1.0
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout_seconds() -> f64 {
    30.0
}

fn default_tool_budget() -> u32 {
    2
}

fn default_idempotency_prefix() -> String {
    "ticket_id".to_string()
}

impl AgentSettings {
    /// @ai:intent Check value ranges serde cannot express
    /// @ai:post Ok means every bounded field is within range
    /// @ai:effects pure
    pub fn validate(&self) -> Result<(), AgentConfigError> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.llm.temperature) {
            errors.push(format!(
                "llm.temperature must be between 0 and 1 (got {})",
                self.llm.temperature
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            errors.push(format!(
                "llm.top_p must be between 0 and 1 (got {})",
                self.llm.top_p
            ));
        }
        if self.llm.max_tokens < 1 {
            errors.push("llm.max_tokens must be at least 1".to_string());
        }
        if !(self.runtime.timeout_seconds.is_finite() && self.runtime.timeout_seconds > 0.0) {
            errors.push(format!(
                "runtime.timeout_seconds must be greater than 0 (got {})",
                self.runtime.timeout_seconds
            ));
        }
        if self.runtime.idempotency_prefix.is_empty() {
            errors.push("runtime.idempotency_prefix must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AgentConfigError::Invalid(errors))
        }
    }
}

/// @ai:intent Parse and validate agent settings from TOML text
/// @ai:effects pure
pub fn load_settings_from_str(content: &str) -> Result<AgentSettings, AgentConfigError> {
    let settings: AgentSettings = toml::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}

/// @ai:intent Read, parse and validate agent settings from a file
/// @ai:effects fs:read
pub fn load_settings(path: &Path) -> Result<AgentSettings, AgentConfigError> {
    if !path.exists() {
        return Err(AgentConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| AgentConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = load_settings_from_str(&content)?;
    tracing::debug!("Loaded agent settings from {} (model {})", path.display(), settings.llm.model);
    Ok(settings)
}

/// @ai:intent Memoized settings loads keyed by path
///            Holds at most `capacity` entries; `clear` forces a reload
pub struct SettingsCache {
    entries: LruCache<PathBuf, AgentSettings>,
}

impl SettingsCache {
    pub const DEFAULT_CAPACITY: usize = 4;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// @ai:intent Load settings for a path, or the default path, reusing a cached copy
    /// @ai:effects fs:read
    pub fn load(&mut self, path: Option<&Path>) -> Result<AgentSettings, AgentConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENT_CONFIG_PATH));

        if let Some(settings) = self.entries.get(&path) {
            return Ok(settings.clone());
        }

        let settings = load_settings(&path)?;
        self.entries.put(path, settings.clone());
        Ok(settings)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new()
    }
}
