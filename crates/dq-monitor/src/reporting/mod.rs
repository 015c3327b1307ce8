//! Report generation module.
//!
//! Reads a finished [`crate::quality::IssueLedger`] and produces:
//! - a console summary (`ReportGenerator::render_summary`)
//! - a serializable [`QualityReport`] (`--json` CLI flag)
//! - the CSV issue log of findings, written only when findings exist
//!
//! # Example
//!
//! ```rust,ignore
//! use dq_monitor::reporting::ReportGenerator;
//!
//! println!("{}", ReportGenerator::render_summary(&ledger));
//!
//! let generator = ReportGenerator::new("data_quality_report.csv");
//! if let Some(path) = generator.write_issue_log(&ledger)? {
//!     println!("Quality report saved to: {}", path.display());
//! }
//! ```

mod generator;

pub use generator::{ISSUE_LOG_COLUMNS, QualityReport, ReportGenerator, SeverityCount};
