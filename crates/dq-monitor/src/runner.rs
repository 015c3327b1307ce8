//! The fixed check suite run over the occupancy, revenue and member tables.

use crate::config::RunConfig;
use crate::error::{Result, ResultExt};
use crate::loader::InputTables;
use crate::quality::{
    IssueLedger, ValueRange, check_duplicates, check_freshness, check_missing_values,
    check_outliers, check_ranges,
};
use crate::reporting::{QualityReport, ReportGenerator};
use chrono::NaiveDateTime;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::info;

pub const OCCUPANCY_TABLE: &str = "occupancy_data";
pub const REVENUE_TABLE: &str = "revenue_data";
pub const MEMBER_TABLE: &str = "member_data";

const OCCUPANCY_KEY: [&str; 2] = ["date", "location"];
const OCCUPANCY_RANGES: [(&str, ValueRange); 2] = [
    ("occupancy_rate", ValueRange::new(0.0, 100.0)),
    ("capacity", ValueRange::new(50.0, 200.0)),
];
const OCCUPANCY_MAX_AGE_DAYS: i64 = 7;
const OCCUPANCY_OUTLIER_COLUMNS: [&str; 1] = ["occupancy_rate"];

const REVENUE_RANGES: [(&str, ValueRange); 2] = [
    ("revenue", ValueRange::new(0.0, 10_000_000.0)),
    ("units_sold", ValueRange::new(0.0, 500.0)),
];

const MEMBER_KEY: [&str; 1] = ["member_id"];
const MEMBER_MAX_AGE_DAYS: i64 = 365;

/// Run every occupancy check.
pub fn check_occupancy(ledger: &mut IssueLedger, occupancy: &DataFrame) -> Result<()> {
    check_missing_values(ledger, occupancy, OCCUPANCY_TABLE)?;
    check_duplicates(ledger, occupancy, OCCUPANCY_TABLE, Some(&OCCUPANCY_KEY[..]))?;
    check_ranges(ledger, occupancy, OCCUPANCY_TABLE, &OCCUPANCY_RANGES)?;
    check_freshness(ledger, occupancy, OCCUPANCY_TABLE, "date", OCCUPANCY_MAX_AGE_DAYS)?;
    check_outliers(ledger, occupancy, OCCUPANCY_TABLE, &OCCUPANCY_OUTLIER_COLUMNS)?;
    Ok(())
}

/// Run every revenue check.
pub fn check_revenue(ledger: &mut IssueLedger, revenue: &DataFrame) -> Result<()> {
    check_missing_values(ledger, revenue, REVENUE_TABLE)?;
    check_duplicates(ledger, revenue, REVENUE_TABLE, None)?;
    check_ranges(ledger, revenue, REVENUE_TABLE, &REVENUE_RANGES)?;
    Ok(())
}

/// Run every member check.
pub fn check_members(ledger: &mut IssueLedger, member: &DataFrame) -> Result<()> {
    check_missing_values(ledger, member, MEMBER_TABLE)?;
    check_duplicates(ledger, member, MEMBER_TABLE, Some(&MEMBER_KEY[..]))?;
    check_freshness(ledger, member, MEMBER_TABLE, "join_date", MEMBER_MAX_AGE_DAYS)?;
    Ok(())
}

/// Run the whole suite in its fixed order.
pub fn run_checks(ledger: &mut IssueLedger, tables: &InputTables) -> Result<()> {
    check_occupancy(ledger, &tables.occupancy).context("Occupancy checks failed")?;
    check_revenue(ledger, &tables.revenue).context("Revenue checks failed")?;
    check_members(ledger, &tables.member).context("Member checks failed")?;
    Ok(())
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub ledger: IssueLedger,
    pub report: QualityReport,
    /// Path of the CSV issue log, when one was written.
    pub issue_log: Option<PathBuf>,
}

/// Loads the inputs, runs the suite and writes the issue log.
pub struct QualityRunner {
    config: RunConfig,
    clock: Option<NaiveDateTime>,
}

impl QualityRunner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            clock: None,
        }
    }

    /// Freeze the session clock used for freshness and timestamps.
    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    /// Execute one run.
    ///
    /// Fails before any check when the configuration is invalid or an input
    /// is missing. Any other error aborts the run without writing the issue
    /// log.
    pub fn run(&self) -> Result<RunOutcome> {
        self.config.validate()?;
        let tables = InputTables::load(&self.config)?;

        let mut ledger = match self.clock {
            Some(now) => IssueLedger::with_clock(now),
            None => IssueLedger::new(),
        };
        run_checks(&mut ledger, &tables)?;

        info!(
            "Checks complete: {} passed, {} issues",
            ledger.passed_count(),
            ledger.issue_count()
        );

        let report = ReportGenerator::build_report(&ledger);
        let issue_log = if self.config.write_issue_log {
            ReportGenerator::new(&self.config.issue_log_path).write_issue_log(&ledger)?
        } else {
            None
        };

        Ok(RunOutcome {
            ledger,
            report,
            issue_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn frozen() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = RunConfig {
            member_file: String::new(),
            ..RunConfig::default()
        };

        let err = QualityRunner::new(config).run().unwrap_err();

        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("member_file"));
    }

    #[test]
    fn test_occupancy_suite_clean() {
        let df = df![
            "date" => ["2026-10-14", "2026-10-15", "2026-10-15"],
            "location" => ["Mumbai - BKC", "Mumbai - BKC", "Delhi - Connaught Place"],
            "occupancy_rate" => [78.5, 81.2, 74.0],
            "capacity" => [100, 100, 100],
            "occupied_desks" => [78, 81, 74],
            "day_of_week" => ["Wednesday", "Thursday", "Thursday"],
        ]
        .unwrap();
        let mut ledger = IssueLedger::with_clock(frozen());

        check_occupancy(&mut ledger, &df).unwrap();

        assert!(ledger.is_clean());
        let passes: Vec<&str> = ledger.passed_checks().iter().map(|p| p.as_str()).collect();
        assert_eq!(
            passes,
            vec![
                "No missing values in occupancy_data",
                "No duplicates in occupancy_data",
                "occupancy_data.occupancy_rate range check",
                "occupancy_data.capacity range check",
                "occupancy_data freshness check",
                "occupancy_data.occupancy_rate outlier check",
            ]
        );
    }

    #[test]
    fn test_occupancy_duplicates_use_date_and_location() {
        let df = df![
            "date" => ["2026-10-15", "2026-10-15"],
            "location" => ["Mumbai - BKC", "Mumbai - BKC"],
            "occupancy_rate" => [78.5, 60.0],
            "capacity" => [100, 100],
        ]
        .unwrap();
        let mut ledger = IssueLedger::with_clock(frozen());

        check_occupancy(&mut ledger, &df).unwrap();

        assert_eq!(ledger.issue_count(), 1);
        assert_eq!(
            ledger.findings()[0].message,
            "occupancy_data: Found 1 duplicate records"
        );
    }

    #[test]
    fn test_revenue_suite_flags_out_of_range() {
        let df = df![
            "month" => [8, 9],
            "location" => ["Pune - Koregaon Park", "Pune - Koregaon Park"],
            "space_type" => ["Hot Desk", "Hot Desk"],
            "units_sold" => [120, 650],
            "revenue" => [960_000.0, 5_200_000.0],
            "avg_price" => [8000, 8000],
        ]
        .unwrap();
        let mut ledger = IssueLedger::with_clock(frozen());

        check_revenue(&mut ledger, &df).unwrap();

        assert_eq!(ledger.issue_count(), 1);
        assert_eq!(
            ledger.findings()[0].message,
            "revenue_data: 1 values in 'units_sold' outside range [0, 500]"
        );
        assert_eq!(ledger.passed_count(), 3);
    }

    #[test]
    fn test_member_suite_stale_join_dates() {
        let df = df![
            "member_id" => ["MEM0001", "MEM0002"],
            "join_date" => ["2024-01-10", "2025-06-01"],
        ]
        .unwrap();
        let mut ledger = IssueLedger::with_clock(frozen());

        check_members(&mut ledger, &df).unwrap();

        assert_eq!(ledger.issue_count(), 1);
        let finding = &ledger.findings()[0];
        assert_eq!(
            finding.message,
            "member_data: Latest data is 502 days old (threshold: 365 days)"
        );
    }
}
