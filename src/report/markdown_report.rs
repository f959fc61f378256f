//! @ai:module:intent Markdown run summary for humans
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter, MarkdownReporterTrait
//! @ai:module:stateless true

use crate::dataset::{Issue, IssueType};
use crate::metrics::{AggregateSummary, EvalResult, MetricValue};
use crate::report::RunReport;
use anyhow::{Context, Result};
use std::fmt::{self, Write as FmtWrite};
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a finished run
    fn generate(&self, report: &RunReport<'_>, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from run results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    fn format_pct(value: f64) -> String {
        format!("{:.1}%", value * 100.0)
    }

    /// @ai:intent Metric names that fell short for one result
    /// @ai:effects pure
    fn failed_metrics(result: &EvalResult) -> Vec<&'static str> {
        let mut failed = Vec::new();

        if result.metric("schema_valid").and_then(MetricValue::as_bool) != Some(true) {
            failed.push("schema_valid");
        }
        if result.metric("categorical_accuracy").and_then(MetricValue::as_f64) != Some(1.0) {
            failed.push("categorical_accuracy");
        }
        if result.metric("next_step_match").and_then(MetricValue::as_bool) != Some(true) {
            failed.push("next_step_match");
        }

        failed
    }

    /// @ai:intent Generate header and summary table
    /// @ai:effects pure
    fn write_summary(out: &mut String, report: &RunReport<'_>) -> fmt::Result {
        let summary: &AggregateSummary = report.summary;

        writeln!(out, "# Ticket Triage Evaluation")?;
        writeln!(out)?;
        writeln!(out, "**Run:** {}", report.run_id)?;
        writeln!(out, "**Agent mode:** {}", report.agent_mode)?;
        writeln!(out)?;
        writeln!(out, "## Summary")?;
        writeln!(out)?;
        writeln!(out, "| Metric | Value |")?;
        writeln!(out, "|--------|-------|")?;
        writeln!(out, "| Examples | {} |", summary.total_examples)?;
        writeln!(
            out,
            "| Categorical Accuracy | {} |",
            Self::format_pct(summary.categorical_accuracy)
        )?;
        writeln!(
            out,
            "| Next Step Match | {} |",
            Self::format_pct(summary.next_step_match_rate)
        )?;
        writeln!(out, "| Schema Valid | {} |", Self::format_pct(summary.schema_valid_pct))?;
        writeln!(out, "| Total Cost | ${:.4} |", summary.total_cost_usd)?;
        writeln!(out)
    }

    /// @ai:intent Generate issue counts by type
    /// @ai:effects pure
    fn write_issues(out: &mut String, issues: &[Issue]) -> fmt::Result {
        writeln!(out, "## Issues")?;
        writeln!(out)?;

        if issues.is_empty() {
            writeln!(out, "No issues found.")?;
            return writeln!(out);
        }

        writeln!(out, "| Type | Count |")?;
        writeln!(out, "|------|-------|")?;
        for issue_type in [
            IssueType::SchemaFailure,
            IssueType::JoinMismatch,
            IssueType::MetricRegression,
        ] {
            let count = issues.iter().filter(|i| i.issue_type == issue_type).count();
            if count > 0 {
                writeln!(out, "| {} | {} |", issue_type, count)?;
            }
        }
        writeln!(out)
    }

    /// @ai:intent Generate the table of examples that missed at least one check
    /// @ai:effects pure
    fn write_failures(out: &mut String, results: &[EvalResult]) -> fmt::Result {
        let failures: Vec<(&EvalResult, Vec<&str>)> = results
            .iter()
            .map(|r| (r, Self::failed_metrics(r)))
            .filter(|(_, failed)| !failed.is_empty())
            .collect();

        writeln!(out, "## Failing Examples")?;
        writeln!(out)?;

        if failures.is_empty() {
            writeln!(out, "All evaluated examples passed.")?;
            return writeln!(out);
        }

        writeln!(out, "| Ticket | Category | Severity | Failed Checks |")?;
        writeln!(out, "|--------|----------|----------|---------------|")?;
        for (result, failed) in failures {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                result.ticket_id,
                result.output.category,
                result.output.severity,
                failed.join(", ")
            )?;
        }
        writeln!(out)
    }

    /// @ai:intent Render the whole report
    /// @ai:effects pure
    pub fn render(report: &RunReport<'_>) -> Result<String, fmt::Error> {
        let mut content = String::new();

        Self::write_summary(&mut content, report)?;
        Self::write_issues(&mut content, report.issues)?;
        Self::write_failures(&mut content, report.results)?;

        Ok(content)
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &RunReport<'_>, output_path: &Path) -> Result<()> {
        let content = Self::render(report)?;
        std::fs::write(output_path, content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricEntry;
    use crate::runner::AgentRunMetadata;
    use crate::schema::{TicketCategory, TicketResult, TicketSeverity};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn result(ticket_id: &str, accuracy: f64, next_step: bool) -> EvalResult {
        let mut metrics = BTreeMap::new();
        metrics.insert("schema_valid".to_string(), MetricEntry::Value(true.into()));
        metrics.insert(
            "categorical_accuracy".to_string(),
            MetricEntry::Value(accuracy.into()),
        );
        metrics.insert(
            "next_step_match".to_string(),
            MetricEntry::Value(next_step.into()),
        );

        EvalResult {
            ticket_id: ticket_id.to_string(),
            output: TicketResult {
                category: TicketCategory::Bug,
                severity: TicketSeverity::Low,
                next_step: "Reproduce".to_string(),
                confidence: 0.4,
            },
            metrics,
            metadata: AgentRunMetadata::default(),
        }
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(MarkdownReporter::format_pct(0.5), "50.0%");
        assert_eq!(MarkdownReporter::format_pct(1.0), "100.0%");
    }

    #[test]
    fn test_failed_metrics_lists_misses() {
        assert!(MarkdownReporter::failed_metrics(&result("TKT-1", 1.0, true)).is_empty());
        assert_eq!(
            MarkdownReporter::failed_metrics(&result("TKT-2", 0.0, false)),
            vec!["categorical_accuracy", "next_step_match"]
        );
    }

    #[test]
    fn test_generate_markdown_report() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("summary.md");

        let results = vec![result("TKT-1", 1.0, true), result("TKT-2", 0.0, true)];
        let issues = vec![Issue::join_mismatch(
            "missing expected result for ticket_id",
            Some("TKT-3".to_string()),
        )];
        let summary = AggregateSummary {
            total_examples: 2,
            categorical_accuracy: 0.5,
            next_step_match_rate: 1.0,
            schema_valid_pct: 1.0,
            total_cost_usd: 0.0,
        };
        let report = RunReport {
            run_id: "20260119T000000Z",
            agent_mode: "gold",
            issues: &issues,
            results: &results,
            summary: &summary,
        };

        MarkdownReporter::new().generate(&report, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("# Ticket Triage Evaluation"));
        assert!(content.contains("| Categorical Accuracy | 50.0% |"));
        assert!(content.contains("| join_mismatch | 1 |"));
        assert!(content.contains("| TKT-2 | bug | low | categorical_accuracy |"));
        assert!(!content.contains("| TKT-1 |"));
    }

    #[test]
    fn test_empty_run_renders() {
        let summary = AggregateSummary::default();
        let report = RunReport {
            run_id: "r",
            agent_mode: "noop",
            issues: &[],
            results: &[],
            summary: &summary,
        };

        let content = MarkdownReporter::render(&report).unwrap();
        assert!(content.contains("No issues found."));
        assert!(content.contains("All evaluated examples passed."));
    }
}
