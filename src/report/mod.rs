//! @ai:module:intent Report generation for evaluation runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, RunReport, JsonReporter, MarkdownReporter

pub mod json_report;
pub mod markdown_report;

pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::dataset::Issue;
use crate::metrics::{AggregateSummary, EvalResult};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const ISSUES_FILE: &str = "issues.jsonl";
pub const SUMMARY_FILE: &str = "summary.json";
pub const RESULTS_FILE: &str = "results.jsonl";
pub const MARKDOWN_FILE: &str = "summary.md";

/// @ai:intent Everything a finished run reports on
#[derive(Debug, Clone, Copy)]
pub struct RunReport<'a> {
    pub run_id: &'a str,
    pub agent_mode: &'a str,
    pub issues: &'a [Issue],
    pub results: &'a [EvalResult],
    pub summary: &'a AggregateSummary,
}

/// @ai:intent Name of a run directory for the given instant, e.g. `20260119T093000Z`
/// @ai:effects pure
pub fn run_id(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// @ai:intent Create `<root>/<run_id>` and return it
/// @ai:effects fs:write
pub fn create_run_dir(root: &Path, run_id: &str) -> Result<PathBuf> {
    let dir = root.join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    Ok(dir)
}

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    /// @ai:intent Write the issue log on its own, before any agent call
    /// @ai:effects fs:write
    pub fn write_issues(&self, issues: &[Issue], output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(ISSUES_FILE);
        self.json.write_issues(issues, &path)?;
        Ok(path)
    }

    /// @ai:intent Generate all reports
    /// @ai:effects fs:write
    pub fn generate_all(&self, report: &RunReport<'_>, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.write_issues(report.issues, output_dir)?;
        self.json
            .write_summary(report.summary, &output_dir.join(SUMMARY_FILE))?;
        self.json
            .write_results(report.results, &output_dir.join(RESULTS_FILE))?;
        self.markdown
            .generate(report, &output_dir.join(MARKDOWN_FILE))?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_run_id_format() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 1, 19, 9, 30, 5).unwrap();
        assert_eq!(run_id(at), "20260119T093005Z");
    }

    #[test]
    fn test_generate_all_writes_every_artifact() {
        let temp = TempDir::new().unwrap();
        let dir = create_run_dir(temp.path(), "20260119T093005Z").unwrap();
        let summary = AggregateSummary::default();
        let report = RunReport {
            run_id: "20260119T093005Z",
            agent_mode: "noop",
            issues: &[],
            results: &[],
            summary: &summary,
        };

        ReportGenerator::new().generate_all(&report, &dir).unwrap();

        for name in [ISSUES_FILE, SUMMARY_FILE, RESULTS_FILE, MARKDOWN_FILE] {
            assert!(dir.join(name).exists(), "{} missing", name);
        }
        assert_eq!(dir, temp.path().join("20260119T093005Z"));
    }
}
