use serde::{Deserialize, Serialize};
use std::fmt;

/// Impact ranking of a [`Finding`].
///
/// Variants are declared from most to least severe, so the derived ordering
/// sorts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The family of check that produced a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Missing Data")]
    MissingData,
    #[serde(rename = "Duplicates")]
    Duplicates,
    #[serde(rename = "Range Validation")]
    RangeValidation,
    #[serde(rename = "Data Freshness")]
    DataFreshness,
    #[serde(rename = "Date Parsing")]
    DateParsing,
    #[serde(rename = "Outliers")]
    Outliers,
    #[serde(rename = "Referential Integrity")]
    ReferentialIntegrity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingData => "Missing Data",
            Self::Duplicates => "Duplicates",
            Self::RangeValidation => "Range Validation",
            Self::DataFreshness => "Data Freshness",
            Self::DateParsing => "Date Parsing",
            Self::Outliers => "Outliers",
            Self::ReferentialIntegrity => "Referential Integrity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable facts backing a finding's message.
///
/// Each variant echoes the numbers interpolated into the message of the
/// finding it is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingDetails {
    MissingValues {
        column: String,
        count: usize,
        percentage: f64,
    },
    Duplicates {
        count: usize,
    },
    OutOfRange {
        column: String,
        count: usize,
        expected_range: [f64; 2],
    },
    Stale {
        latest_date: String,
        age_days: i64,
    },
    Outliers {
        column: String,
        count: usize,
        percentage: f64,
    },
    Orphans {
        count: usize,
        key: String,
    },
}

/// A recorded data quality issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Capture time, formatted as `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FindingDetails>,
}

impl Finding {
    /// Render `details` as a JSON string, or an empty string when absent.
    pub fn details_json(&self) -> serde_json::Result<String> {
        match &self.details {
            Some(details) => serde_json::to_string(details),
            None => Ok(String::new()),
        }
    }
}

/// Name of a check/table/column combination that completed without issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassedCheck(pub String);

impl PassedCheck {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PassedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
