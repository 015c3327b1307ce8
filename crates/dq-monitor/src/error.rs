//! Custom error types for the data quality monitor.
//!
//! Only structural failures are errors here. Data quality problems found in
//! the inputs are recorded as [`crate::types::Finding`]s and never propagate
//! through this type.
//!
//! Errors are serializable so that `--json` consumers receive a stable
//! `code` alongside the human-readable message.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for a quality check run.
#[derive(Error, Debug)]
pub enum QualityError {
    /// One or more required input tables are absent.
    #[error("Required data files not found: {}", display_paths(.missing))]
    InputsNotFound { missing: Vec<PathBuf> },

    /// A date column could not be coerced to dates.
    #[error("Error parsing date column '{column}': {reason}")]
    DateParse { column: String, reason: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing the report or issue log failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputsNotFound { .. } => "INPUTS_NOT_FOUND",
            Self::DateParse { .. } => "DATE_PARSE_FAILED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error means the input tables have not been generated yet.
    pub fn is_inputs_not_found(&self) -> bool {
        match self {
            Self::InputsNotFound { .. } => true,
            Self::WithContext { source, .. } => source.is_inputs_not_found(),
            _ => false,
        }
    }

    /// Check if this error is recovered locally instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::DateParse { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for QualityError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        QualityError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality check operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let error = QualityError::InputsNotFound {
            missing: vec![PathBuf::from("occupancy_data.csv")],
        };
        assert_eq!(error.error_code(), "INPUTS_NOT_FOUND");
        assert_eq!(
            QualityError::ColumnNotFound("date".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_inputs_not_found_message_lists_paths() {
        let error = QualityError::InputsNotFound {
            missing: vec![
                PathBuf::from("revenue_data.csv"),
                PathBuf::from("member_data.csv"),
            ],
        };
        let message = error.to_string();
        assert!(message.contains("revenue_data.csv"));
        assert!(message.contains("member_data.csv"));
    }

    #[test]
    fn test_is_inputs_not_found_through_context() {
        let error = QualityError::InputsNotFound { missing: vec![] }.with_context("Loading");
        assert!(error.is_inputs_not_found());
        assert!(!QualityError::Internal("boom".to_string()).is_inputs_not_found());
    }

    #[test]
    fn test_is_recoverable() {
        let error = QualityError::DateParse {
            column: "date".to_string(),
            reason: "bad".to_string(),
        };
        assert!(error.is_recoverable());
        assert!(!QualityError::InvalidConfig("x".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = QualityError::ColumnNotFound("member_id".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("member_id"));
    }

    #[test]
    fn test_with_context() {
        let error = QualityError::ColumnNotFound("date".to_string()).with_context("During checks");
        assert!(error.to_string().contains("During checks"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
