//! @ai:module:intent Configuration structs for the evaluation harness
//! @ai:module:layer infrastructure
//! @ai:module:public_api EvalConfig, RunConfig, PathConfig, AgentSettings, SettingsCache
//! @ai:module:stateless true

pub mod agent;

pub use agent::{
    load_settings, load_settings_from_str, AgentConfigError, AgentSettings, LlmSettings,
    RuntimeLimits, SettingsCache, ToolSpec, ToolingSettings, DEFAULT_AGENT_CONFIG_PATH,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location for the harness configuration file
pub const DEFAULT_EVAL_CONFIG_PATH: &str = "eval.toml";

/// @ai:intent Main configuration for an evaluation run
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Run configuration: which agent to drive and how strictly to gate
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_agent_mode")]
    pub agent_mode: String,
    #[serde(default)]
    pub agent_endpoint: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default = "default_schema_valid_threshold")]
    pub schema_valid_threshold: f64,
}

/// @ai:intent Input files and output locations
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default)]
    pub tasks: Option<PathBuf>,
    #[serde(default)]
    pub labels: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_agent_config")]
    pub agent_config: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            agent_mode: default_agent_mode(),
            agent_endpoint: None,
            limit: None,
            schema_valid_threshold: default_schema_valid_threshold(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            tasks: None,
            labels: None,
            output_dir: default_output_dir(),
            agent_config: default_agent_config(),
        }
    }
}

fn default_agent_mode() -> String {
    "noop".to_string()
}

fn default_schema_valid_threshold() -> f64 {
    0.95
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports/phaseA/runs")
}

fn default_agent_config() -> PathBuf {
    PathBuf::from(DEFAULT_AGENT_CONFIG_PATH)
}

impl EvalConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Load configuration if the file exists, otherwise fall back to defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: EvalConfig = toml::from_str("").unwrap();
        assert_eq!(config, EvalConfig::default());
        assert_eq!(config.run.agent_mode, "noop");
        assert_eq!(config.run.schema_valid_threshold, 0.95);
        assert_eq!(config.paths.output_dir, PathBuf::from("reports/phaseA/runs"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: EvalConfig = toml::from_str(
            r#"
[run]
agent_mode = "gold"
limit = 5

[paths]
tasks = "data/tasks.jsonl"
"#,
        )
        .unwrap();

        assert_eq!(config.run.agent_mode, "gold");
        assert_eq!(config.run.limit, Some(5));
        assert_eq!(config.run.schema_valid_threshold, 0.95);
        assert_eq!(config.paths.tasks, Some(PathBuf::from("data/tasks.jsonl")));
        assert_eq!(config.paths.labels, None);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("eval.toml");

        let mut config = EvalConfig::default();
        config.run.agent_endpoint = Some("http://localhost:8080/triage".to_string());
        config.save(&path).unwrap();

        assert_eq!(EvalConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let config = EvalConfig::load_or_default(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, EvalConfig::default());
    }
}
