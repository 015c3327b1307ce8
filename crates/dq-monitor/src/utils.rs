//! Shared utilities for the quality checks.
//!
//! Data type classification for polars columns and the date coercion used by
//! the freshness check.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for the purposes of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a calendar date or datetime.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Date Parsing Utilities
// =============================================================================

/// Datetime layouts accepted by [`parse_date_string`]. `%.f` also matches an
/// absent fractional part.
pub const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts accepted by [`parse_date_string`]; parsed as midnight.
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a textual date or datetime.
///
/// # Example
///
/// ```rust,ignore
/// use dq_monitor::utils::parse_date_string;
///
/// assert!(parse_date_string("2026-10-06").is_some());
/// assert!(parse_date_string("2026-10-06 14:00").is_some());
/// assert!(parse_date_string("next tuesday").is_none());
/// ```
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Whole days elapsed from `earlier` to `now`, floored.
///
/// A timestamp later than `now` yields a negative age.
pub fn age_in_days(now: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    (now - earlier).num_seconds().div_euclid(86_400)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        parse_date_string(date).unwrap()
    }

    #[test]
    fn test_numeric_dtypes() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::UInt8), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(get_dtype_category(&DataType::Boolean), DtypeCategory::Boolean);
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = at("2026-10-06");
        assert_eq!(parsed.to_string(), "2026-10-06 00:00:00");
        assert_eq!(at("2026/10/06").to_string(), "2026-10-06 00:00:00");
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert_eq!(at("2026-10-06 09:00").to_string(), "2026-10-06 09:00:00");
        assert_eq!(at("2026-10-06 09:15:30").to_string(), "2026-10-06 09:15:30");
        assert_eq!(at("2026-10-06T09:15:30").to_string(), "2026-10-06 09:15:30");
        assert!(parse_date_string("2026-10-06 09:15:30.250").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date_string("not a date").is_none());
        assert!(parse_date_string("2026-13-40").is_none());
        assert!(parse_date_string("   ").is_none());
    }

    #[test]
    fn test_age_in_days_floors() {
        let now = at("2026-10-16 15:30:00");
        assert_eq!(age_in_days(now, at("2026-10-06")), 10);
        assert_eq!(age_in_days(now, at("2026-10-16")), 0);
        // 9.5 hours in the future floors to -1
        assert_eq!(age_in_days(now, at("2026-10-17 01:00:00")), -1);
    }
}
