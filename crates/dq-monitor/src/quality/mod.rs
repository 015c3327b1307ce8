//! Data quality checking.
//!
//! [`IssueLedger`] holds the findings and passed checks of one run; the
//! functions in [`rules`] evaluate tables and append to it.

mod ledger;
pub mod rules;
pub mod statistics;

pub use ledger::{IssueLedger, TIMESTAMP_FORMAT};
pub use rules::{
    DEFAULT_MAX_AGE_DAYS, ValueRange, check_duplicates, check_freshness, check_missing_values,
    check_outliers, check_ranges, check_referential_integrity,
};
pub use statistics::{IqrSummary, iqr_outliers};
