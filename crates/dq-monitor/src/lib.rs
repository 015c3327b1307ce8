//! Data Quality Monitor Library
//!
//! Rule-based quality checks for the workspace occupancy, revenue and
//! member tables, built with Rust and Polars.
//!
//! # Overview
//!
//! A run loads three CSV tables, applies a fixed suite of checks and
//! records the outcome of each one in an [`IssueLedger`]:
//!
//! - **Missing values**: per-column null counts, severity by percentage
//! - **Duplicates**: repeated rows over a key subset or all columns
//! - **Ranges**: inclusive numeric bounds per column
//! - **Freshness**: age of the newest date against a threshold
//! - **Outliers**: IQR rule, reported when more than 5% of rows fall outside
//! - **Referential integrity**: child keys that are missing from a parent
//!
//! The [`ReportGenerator`] renders the ledger as a console summary and
//! writes the findings to a CSV issue log.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dq_monitor::{QualityRunner, ReportGenerator, RunConfig};
//!
//! let config = RunConfig::builder().data_dir("data").build()?;
//! let outcome = QualityRunner::new(config).run()?;
//!
//! println!("{}", ReportGenerator::render_summary(&outcome.ledger));
//! if let Some(path) = outcome.issue_log {
//!     println!("Quality report saved to: {}", path.display());
//! }
//! ```
//!
//! # Individual rules
//!
//! Rules work on anything implementing [`Table`], which includes a Polars
//! `DataFrame`:
//!
//! ```rust,ignore
//! use dq_monitor::quality::{IssueLedger, check_referential_integrity};
//!
//! let mut ledger = IssueLedger::new();
//! check_referential_integrity(&mut ledger, &bookings, &members, "bookings", "members", "member_id")?;
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod quality;
pub mod reporting;
pub mod runner;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, RunConfig, RunConfigBuilder};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use loader::InputTables;
pub use quality::{IssueLedger, ValueRange};
pub use reporting::{QualityReport, ReportGenerator, SeverityCount};
pub use runner::{QualityRunner, RunOutcome, run_checks};
pub use table::Table;
pub use types::{Category, Finding, FindingDetails, PassedCheck, Severity};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype, parse_date_string};
