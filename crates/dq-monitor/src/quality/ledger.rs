//! Session state of a single quality check run.

use crate::types::{Category, Finding, FindingDetails, PassedCheck, Severity};
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use tracing::debug;

/// Timestamp layout used for findings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only record of findings and passed checks for one run.
///
/// Every rule receives the ledger by mutable reference and appends to it;
/// the report generator only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct IssueLedger {
    findings: Vec<Finding>,
    passed: Vec<PassedCheck>,
    clock: Option<NaiveDateTime>,
}

impl IssueLedger {
    /// Create an empty ledger that reads the local wall clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with a frozen clock.
    ///
    /// Freshness ages and finding timestamps are computed against `now`.
    pub fn with_clock(now: NaiveDateTime) -> Self {
        Self {
            clock: Some(now),
            ..Self::default()
        }
    }

    /// Current time as seen by this session.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Record a finding, stamped with the session clock.
    pub fn add_issue(
        &mut self,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
        details: Option<FindingDetails>,
    ) {
        let message = message.into();
        let timestamp = self.now().format(TIMESTAMP_FORMAT).to_string();
        debug!("[{}] {}: {}", severity, category, message);
        self.findings.push(Finding {
            timestamp,
            severity,
            category,
            message,
            details,
        });
    }

    /// Record a check that found no issue.
    pub fn add_pass(&mut self, check_name: impl Into<String>) {
        self.passed.push(PassedCheck::new(check_name));
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn passed_checks(&self) -> &[PassedCheck] {
        &self.passed
    }

    pub fn issue_count(&self) -> usize {
        self.findings.len()
    }

    pub fn passed_count(&self) -> usize {
        self.passed.len()
    }

    /// True when no findings were recorded.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings per severity, only for severities that occur.
    ///
    /// Ordered by count descending; ties are broken by severity (HIGH first).
    pub fn severity_counts(&self) -> Vec<(Severity, usize)> {
        let mut counts: HashMap<Severity, usize> = HashMap::new();
        for finding in &self.findings {
            *counts.entry(finding.severity).or_insert(0) += 1;
        }

        let mut counts: Vec<(Severity, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }
}
