//! The quality rule library.
//!
//! Each rule inspects one or two tables and appends findings or passed
//! checks to the session [`IssueLedger`]. Rules only return an error for
//! structural faults (a subset column that does not exist, a failing
//! cast); problems in the data itself always end up in the ledger.

use super::ledger::IssueLedger;
use super::statistics::iqr_outliers;
use crate::error::{QualityError, Result};
use crate::table::Table;
use crate::types::{Category, FindingDetails, Severity};
use crate::utils::age_in_days;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Freshness threshold used when a caller has no specific requirement.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Missing-value percentage above which a column is HIGH severity.
pub const MISSING_HIGH_PCT: f64 = 10.0;
/// Missing-value percentage above which a column is MEDIUM severity.
pub const MISSING_MEDIUM_PCT: f64 = 5.0;
/// Outlier percentage above which a column is reported.
pub const OUTLIER_PCT_THRESHOLD: f64 = 5.0;

/// Inclusive bounds for a range check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    (count as f64 / total as f64) * 100.0
}

/// Severity of a column with `pct` percent missing values (`pct > 0`).
pub fn missing_value_severity(pct: f64) -> Severity {
    if pct > MISSING_HIGH_PCT {
        Severity::High
    } else if pct > MISSING_MEDIUM_PCT {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Report every column that contains missing values (nulls or NaN).
///
/// Records a single pass for the table when no column has nulls. An empty
/// table records nothing.
pub fn check_missing_values<T: Table + ?Sized>(
    ledger: &mut IssueLedger,
    table: &T,
    table_name: &str,
) -> Result<()> {
    info!("Checking missing values in {}...", table_name);

    let rows = table.row_count();
    if rows == 0 {
        debug!("{} is empty, skipping missing value check", table_name);
        return Ok(());
    }

    let mut affected = 0;
    for column in table.column_names() {
        let count = table.missing_count(&column)?;
        if count == 0 {
            continue;
        }

        affected += 1;
        let pct = percentage(count, rows);
        ledger.add_issue(
            missing_value_severity(pct),
            Category::MissingData,
            format!(
                "{}: Column '{}' has {} missing values ({:.1}%)",
                table_name, column, count, pct
            ),
            Some(FindingDetails::MissingValues {
                column,
                count,
                percentage: pct,
            }),
        );
    }

    if affected == 0 {
        ledger.add_pass(format!("No missing values in {}", table_name));
        debug!("No missing values detected");
    } else {
        warn!("{}: {} columns with missing values", table_name, affected);
    }

    Ok(())
}

/// Report duplicate records as a single MEDIUM finding.
///
/// Rows are compared across `subset` when given, otherwise across all
/// columns. The first occurrence of a repeated key is not counted.
pub fn check_duplicates<T: Table + ?Sized>(
    ledger: &mut IssueLedger,
    table: &T,
    table_name: &str,
    subset: Option<&[&str]>,
) -> Result<()> {
    info!("Checking duplicates in {}...", table_name);

    let count = table.duplicate_count(subset)?;
    if count > 0 {
        ledger.add_issue(
            Severity::Medium,
            Category::Duplicates,
            format!("{}: Found {} duplicate records", table_name, count),
            Some(FindingDetails::Duplicates { count }),
        );
        warn!("Found {} duplicate records", count);
    } else {
        ledger.add_pass(format!("No duplicates in {}", table_name));
        debug!("No duplicates detected");
    }

    Ok(())
}

/// Check numeric columns against inclusive bounds.
///
/// Columns absent from the table, or not numeric, are skipped. Nulls are
/// never out of range.
pub fn check_ranges<T: Table + ?Sized>(
    ledger: &mut IssueLedger,
    table: &T,
    table_name: &str,
    ranges: &[(&str, ValueRange)],
) -> Result<()> {
    info!("Checking data ranges in {}...", table_name);

    for (column, range) in ranges {
        if !table.has_column(column) {
            continue;
        }
        let Some(values) = table.numeric_column(column)? else {
            debug!("Column '{}' is not numeric, skipping range check", column);
            continue;
        };

        let count = values
            .iter()
            .flatten()
            .filter(|&&val| !val.is_nan() && !range.contains(val))
            .count();

        if count > 0 {
            ledger.add_issue(
                Severity::Medium,
                Category::RangeValidation,
                format!(
                    "{}: {} values in '{}' outside range [{}, {}]",
                    table_name, count, column, range.min, range.max
                ),
                Some(FindingDetails::OutOfRange {
                    column: column.to_string(),
                    count,
                    expected_range: [range.min, range.max],
                }),
            );
            warn!("Column '{}': {} values out of range", column, count);
        } else {
            ledger.add_pass(format!("{}.{} range check", table_name, column));
            debug!("Column '{}': all values in valid range", column);
        }
    }

    Ok(())
}

fn latest_date(dates: Vec<Option<NaiveDateTime>>, column: &str) -> Result<NaiveDateTime> {
    dates
        .into_iter()
        .flatten()
        .max()
        .ok_or_else(|| QualityError::DateParse {
            column: column.to_string(),
            reason: "column contains no dates".to_string(),
        })
}

/// Check that the newest value of `date_column` is at most `max_age_days`
/// old.
///
/// A column that cannot be coerced to dates is recorded as a MEDIUM "Date
/// Parsing" finding. A column absent from the table is skipped.
pub fn check_freshness<T: Table + ?Sized>(
    ledger: &mut IssueLedger,
    table: &T,
    table_name: &str,
    date_column: &str,
    max_age_days: i64,
) -> Result<()> {
    info!("Checking data freshness in {}...", table_name);

    if !table.has_column(date_column) {
        return Ok(());
    }

    let latest = match table
        .date_column(date_column)
        .and_then(|dates| latest_date(dates, date_column))
    {
        Ok(latest) => latest,
        Err(e) => {
            let reason = match e {
                QualityError::DateParse { reason, .. } => reason,
                other => other.to_string(),
            };
            ledger.add_issue(
                Severity::Medium,
                Category::DateParsing,
                format!(
                    "{}: Error parsing date column '{}': {}",
                    table_name, date_column, reason
                ),
                None,
            );
            warn!("Could not parse date column '{}'", date_column);
            return Ok(());
        }
    };

    let age_days = age_in_days(ledger.now(), latest);
    if age_days > max_age_days {
        ledger.add_issue(
            Severity::High,
            Category::DataFreshness,
            format!(
                "{}: Latest data is {} days old (threshold: {} days)",
                table_name, age_days, max_age_days
            ),
            Some(FindingDetails::Stale {
                latest_date: latest.to_string(),
                age_days,
            }),
        );
        warn!("Data is {} days old (threshold: {})", age_days, max_age_days);
    } else {
        ledger.add_pass(format!("{} freshness check", table_name));
        debug!("Data is fresh ({} days old)", age_days);
    }

    Ok(())
}

/// Detect outliers with the IQR rule.
///
/// A column is reported (LOW) when more than 5% of rows fall outside the
/// whiskers. Absent or non-numeric columns are skipped, as is an empty
/// table.
pub fn check_outliers<T: Table + ?Sized>(
    ledger: &mut IssueLedger,
    table: &T,
    table_name: &str,
    columns: &[&str],
) -> Result<()> {
    info!("Checking outliers in {}...", table_name);

    let rows = table.row_count();
    if rows == 0 {
        debug!("{} is empty, skipping outlier check", table_name);
        return Ok(());
    }

    for column in columns {
        if !table.has_column(column) {
            continue;
        }
        let Some(values) = table.numeric_column(column)? else {
            continue;
        };

        let count = iqr_outliers(&values).map_or(0, |summary| summary.outlier_count);
        let pct = percentage(count, rows);

        if pct > OUTLIER_PCT_THRESHOLD {
            ledger.add_issue(
                Severity::Low,
                Category::Outliers,
                format!(
                    "{}: Column '{}' has {} outliers ({:.1}%)",
                    table_name, column, count, pct
                ),
                Some(FindingDetails::Outliers {
                    column: column.to_string(),
                    count,
                    percentage: pct,
                }),
            );
            warn!("Column '{}': {} outliers detected ({:.1}%)", column, count, pct);
        } else {
            ledger.add_pass(format!("{}.{} outlier check", table_name, column));
        }
    }

    Ok(())
}

/// Bit pattern of a numeric key, with `-0.0` folded into `0.0`.
fn numeric_key(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

/// Check that every `key_column` value of `child` exists in `parent`.
///
/// Numeric keys compare by value whatever their integer or float storage;
/// other keys compare by their textual rendering. Skipped when either table
/// lacks the key column.
pub fn check_referential_integrity<C, P>(
    ledger: &mut IssueLedger,
    child: &C,
    parent: &P,
    child_name: &str,
    parent_name: &str,
    key_column: &str,
) -> Result<()>
where
    C: Table + ?Sized,
    P: Table + ?Sized,
{
    info!(
        "Checking referential integrity between {} and {}...",
        child_name, parent_name
    );

    if !child.has_column(key_column) || !parent.has_column(key_column) {
        return Ok(());
    }

    let count = match (child.numeric_column(key_column)?, parent.numeric_column(key_column)?) {
        (Some(child_keys), Some(parent_keys)) => {
            let parent_keys: HashSet<Option<u64>> =
                parent_keys.into_iter().map(|k| k.map(numeric_key)).collect();
            child_keys
                .into_iter()
                .filter(|k| !parent_keys.contains(&k.map(numeric_key)))
                .count()
        }
        _ => {
            let parent_keys: HashSet<Option<String>> =
                parent.text_column(key_column)?.into_iter().collect();
            child
                .text_column(key_column)?
                .iter()
                .filter(|key| !parent_keys.contains(*key))
                .count()
        }
    };

    if count > 0 {
        ledger.add_issue(
            Severity::High,
            Category::ReferentialIntegrity,
            format!(
                "Found {} orphaned records in {} (missing {} in {})",
                count, child_name, key_column, parent_name
            ),
            Some(FindingDetails::Orphans {
                count,
                key: key_column.to_string(),
            }),
        );
        warn!("{} orphaned records found", count);
    } else {
        ledger.add_pass(format!(
            "Referential integrity: {} <-> {}",
            child_name, parent_name
        ));
        debug!("Referential integrity maintained");
    }

    Ok(())
}
