use crate::error::{QualityError, Result};
use crate::quality::{IssueLedger, TIMESTAMP_FORMAT};
use crate::types::{Finding, PassedCheck, Severity};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

/// Width of the rules framing the console report.
const RULE_WIDTH: usize = 70;

/// Column names of the CSV issue log, in order.
pub const ISSUE_LOG_COLUMNS: [&str; 5] = ["timestamp", "severity", "category", "message", "details"];

// ============================================================================
// Report Types
// ============================================================================

/// Number of findings with a given severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

/// Aggregated outcome of a run.
///
/// Used for `--json` output and by library callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Passed checks plus findings
    pub total_checks: usize,
    /// Number of passed checks
    pub passed: usize,
    /// Number of findings
    pub issues: usize,
    /// Findings per severity, only for severities that occur
    pub severity_counts: Vec<SeverityCount>,
    /// Names of the passed checks, in run order
    pub passed_checks: Vec<PassedCheck>,
    /// Every finding, in run order
    pub issues_detail: Vec<Finding>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues == 0
    }
}

/// Turns a finished [`IssueLedger`] into console output, a
/// [`QualityReport`], and the CSV issue log.
pub struct ReportGenerator {
    issue_log_path: PathBuf,
}

impl ReportGenerator {
    /// Create a ReportGenerator writing the issue log to `issue_log_path`.
    pub fn new(issue_log_path: impl Into<PathBuf>) -> Self {
        Self {
            issue_log_path: issue_log_path.into(),
        }
    }

    /// Build the structured report for a ledger.
    pub fn build_report(ledger: &IssueLedger) -> QualityReport {
        QualityReport {
            generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            total_checks: ledger.passed_count() + ledger.issue_count(),
            passed: ledger.passed_count(),
            issues: ledger.issue_count(),
            severity_counts: ledger
                .severity_counts()
                .into_iter()
                .map(|(severity, count)| SeverityCount { severity, count })
                .collect(),
            passed_checks: ledger.passed_checks().to_vec(),
            issues_detail: ledger.findings().to_vec(),
        }
    }

    /// Render the human-readable console summary.
    pub fn render_summary(ledger: &IssueLedger) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(out, "DATA QUALITY REPORT");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "\nPassed Checks: {}", ledger.passed_count());
        let _ = writeln!(out, "Issues Found: {}", ledger.issue_count());

        if ledger.is_clean() {
            let _ = writeln!(
                out,
                "\nAll quality checks passed! Data is clean and ready for analysis."
            );
        } else {
            let _ = writeln!(out, "\nIssues by Severity:");
            for (severity, count) in ledger.severity_counts() {
                let _ = writeln!(out, "  {}: {}", severity, count);
            }

            let _ = writeln!(out, "\nDetailed Issues:");
            for (i, finding) in ledger.findings().iter().enumerate() {
                let _ = writeln!(
                    out,
                    "\n  {}. [{}] {}",
                    i + 1,
                    finding.severity,
                    finding.category
                );
                let _ = writeln!(out, "     {}", finding.message);
                let _ = writeln!(out, "     Time: {}", finding.timestamp);
            }
        }

        let _ = writeln!(out, "\n{}", rule);
        out
    }

    /// Flatten the findings into the issue log schema.
    pub fn issue_log_frame(ledger: &IssueLedger) -> Result<DataFrame> {
        let findings = ledger.findings();
        let details = findings
            .iter()
            .map(|f| f.details_json())
            .collect::<serde_json::Result<Vec<String>>>()?;

        let df = df![
            ISSUE_LOG_COLUMNS[0] => findings.iter().map(|f| f.timestamp.clone()).collect::<Vec<_>>(),
            ISSUE_LOG_COLUMNS[1] => findings.iter().map(|f| f.severity.to_string()).collect::<Vec<_>>(),
            ISSUE_LOG_COLUMNS[2] => findings.iter().map(|f| f.category.to_string()).collect::<Vec<_>>(),
            ISSUE_LOG_COLUMNS[3] => findings.iter().map(|f| f.message.clone()).collect::<Vec<_>>(),
            ISSUE_LOG_COLUMNS[4] => details,
        ]?;

        Ok(df)
    }

    /// Write the findings to the CSV issue log.
    ///
    /// Nothing is written when the ledger has no findings; returns the path
    /// written otherwise.
    pub fn write_issue_log(&self, ledger: &IssueLedger) -> Result<Option<PathBuf>> {
        if ledger.is_clean() {
            return Ok(None);
        }

        let mut df = Self::issue_log_frame(ledger)?;

        if let Some(parent) = self.issue_log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&self.issue_log_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .map_err(|e| QualityError::ReportGenerationFailed(e.to_string()))?;

        info!("Quality report saved to: {}", self.issue_log_path.display());
        Ok(Some(self.issue_log_path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, FindingDetails};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn ledger_with_findings() -> IssueLedger {
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let mut ledger = IssueLedger::with_clock(now);
        ledger.add_pass("No missing values in occupancy_data");
        ledger.add_issue(
            Severity::Medium,
            Category::Duplicates,
            "occupancy_data: Found 3 duplicate records",
            Some(FindingDetails::Duplicates { count: 3 }),
        );
        ledger.add_issue(
            Severity::High,
            Category::DataFreshness,
            "member_data: Latest data is 400 days old (threshold: 365 days)",
            Some(FindingDetails::Stale {
                latest_date: "2025-09-11 00:00:00".to_string(),
                age_days: 400,
            }),
        );
        ledger.add_issue(
            Severity::Medium,
            Category::DateParsing,
            "revenue_data: Error parsing date column 'month': bad value",
            None,
        );
        ledger
    }

    #[test]
    fn test_build_report_counts() {
        let ledger = ledger_with_findings();
        let report = ReportGenerator::build_report(&ledger);

        assert_eq!(report.total_checks, 4);
        assert_eq!(report.passed, 1);
        assert_eq!(report.issues, 3);
        assert!(!report.is_clean());
        assert_eq!(
            report.severity_counts,
            vec![
                SeverityCount { severity: Severity::Medium, count: 2 },
                SeverityCount { severity: Severity::High, count: 1 },
            ]
        );
        assert_eq!(report.issues_detail.len(), 3);
    }

    #[test]
    fn test_render_summary_lists_findings_in_order() {
        let ledger = ledger_with_findings();
        let summary = ReportGenerator::render_summary(&ledger);

        assert!(summary.contains("Passed Checks: 1"));
        assert!(summary.contains("Issues Found: 3"));
        assert!(summary.contains("  MEDIUM: 2"));
        assert!(summary.contains("  HIGH: 1"));
        assert!(!summary.contains("LOW:"));

        let first = summary.find("1. [MEDIUM] Duplicates").unwrap();
        let second = summary.find("2. [HIGH] Data Freshness").unwrap();
        let third = summary.find("3. [MEDIUM] Date Parsing").unwrap();
        assert!(first < second && second < third);
        assert!(summary.contains("Time: 2026-10-16 08:00:00"));
        assert!(!summary.contains("All quality checks passed"));
    }

    #[test]
    fn test_render_summary_clean_run() {
        let mut ledger = IssueLedger::new();
        ledger.add_pass("No duplicates in revenue_data");
        let summary = ReportGenerator::render_summary(&ledger);

        assert!(summary.contains("Passed Checks: 1"));
        assert!(summary.contains("Issues Found: 0"));
        assert!(summary.contains("All quality checks passed!"));
        assert!(!summary.contains("Detailed Issues"));
    }

    #[test]
    fn test_issue_log_frame_schema() {
        let df = ReportGenerator::issue_log_frame(&ledger_with_findings()).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ISSUE_LOG_COLUMNS.to_vec());
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_write_issue_log_skipped_when_clean() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data_quality_report.csv");
        let generator = ReportGenerator::new(&path);

        let written = generator.write_issue_log(&IssueLedger::new()).unwrap();

        assert!(written.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_issue_log_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("data_quality_report.csv");
        let generator = ReportGenerator::new(&path);

        let written = generator.write_issue_log(&ledger_with_findings()).unwrap();
        assert_eq!(written, Some(path.clone()));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "timestamp,severity,category,message,details");
        assert_eq!(
            lines[1],
            r#"2026-10-16 08:00:00,MEDIUM,Duplicates,occupancy_data: Found 3 duplicate records,"{""kind"":""duplicates"",""count"":3}""#
        );
        assert!(lines[2].starts_with(
            "2026-10-16 08:00:00,HIGH,Data Freshness,member_data: Latest data is 400 days old (threshold: 365 days),"
        ));
        assert!(lines[3].starts_with("2026-10-16 08:00:00,MEDIUM,Date Parsing,"));
    }
}
