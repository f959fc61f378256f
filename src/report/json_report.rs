//! @ai:module:intent JSON and JSON Lines exports for issues, results and the summary
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReporterTrait
//! @ai:module:stateless true

use crate::dataset::Issue;
use crate::metrics::{AggregateSummary, EvalResult};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write one issue object per line
    fn write_issues(&self, issues: &[Issue], output_path: &Path) -> Result<()>;

    /// @ai:intent Write the run summary as a pretty-printed object
    fn write_summary(&self, summary: &AggregateSummary, output_path: &Path) -> Result<()>;

    /// @ai:intent Write one scored result per line
    fn write_results(&self, results: &[EvalResult], output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes machine-readable run artifacts
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Serialize records as JSON Lines; an empty slice gives an empty file
    /// @ai:effects fs:write
    fn write_jsonl<T: Serialize>(records: &[T], output_path: &Path) -> Result<()> {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        let mut writer = BufWriter::new(file);

        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn write_issues(&self, issues: &[Issue], output_path: &Path) -> Result<()> {
        Self::write_jsonl(issues, output_path)?;
        tracing::info!("Wrote {} issues to {}", issues.len(), output_path.display());
        Ok(())
    }

    /// @ai:effects fs:write
    fn write_summary(&self, summary: &AggregateSummary, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(output_path, json + "\n")
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }

    /// @ai:effects fs:write
    fn write_results(&self, results: &[EvalResult], output_path: &Path) -> Result<()> {
        Self::write_jsonl(results, output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::IssueType;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_issues_written_one_per_line() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("issues.jsonl");

        let issues = vec![
            Issue::schema_failure("tasks.jsonl:2 invalid JSON (EOF while parsing)", None),
            Issue::join_mismatch("orphan expected result without matching task", Some("TKT-9".to_string())),
        ];

        reporter.write_issues(&issues, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["ticket_id"], Value::Null);
        assert_eq!(lines[1]["issue_type"], json!("join_mismatch"));
        assert_eq!(lines[1]["severity"], json!("ERROR"));

        let parsed: Issue = serde_json::from_value(lines[1].clone()).unwrap();
        assert_eq!(parsed.issue_type, IssueType::JoinMismatch);
    }

    #[test]
    fn test_no_issues_gives_empty_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("issues.jsonl");

        JsonReporter::new().write_issues(&[], &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_summary_is_pretty_with_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("summary.json");

        JsonReporter::new()
            .write_summary(&AggregateSummary::default(), &output)
            .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.ends_with("}\n"));
        assert!(content.contains("\n  \"total_examples\": 0,"));

        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "total_examples": 0,
                "categorical_accuracy": 0.0,
                "next_step_match_rate": 0.0,
                "schema_valid_pct": 0.0,
                "total_cost_usd": 0.0
            })
        );
    }
}
