//! Configuration for a quality check run.
//!
//! The set of checks and their parameters are fixed by the runner; this
//! only controls where inputs are read from and where the issue log goes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default file name of the occupancy table.
pub const DEFAULT_OCCUPANCY_FILE: &str = "occupancy_data.csv";
/// Default file name of the revenue table.
pub const DEFAULT_REVENUE_FILE: &str = "revenue_data.csv";
/// Default file name of the member table.
pub const DEFAULT_MEMBER_FILE: &str = "member_data.csv";
/// Default path of the CSV issue log.
pub const DEFAULT_ISSUE_LOG: &str = "data_quality_report.csv";

/// Configuration for a quality check run.
///
/// Use [`RunConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use dq_monitor::config::RunConfig;
///
/// let config = RunConfig::builder()
///     .data_dir("data")
///     .issue_log_path("reports/issues.csv")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding the input tables.
    /// Default: "."
    pub data_dir: PathBuf,

    /// File name of the occupancy table inside `data_dir`.
    /// Default: "occupancy_data.csv"
    pub occupancy_file: String,

    /// File name of the revenue table inside `data_dir`.
    /// Default: "revenue_data.csv"
    pub revenue_file: String,

    /// File name of the member table inside `data_dir`.
    /// Default: "member_data.csv"
    pub member_file: String,

    /// Where the CSV issue log is written when findings exist.
    /// Default: "data_quality_report.csv"
    pub issue_log_path: PathBuf,

    /// Whether to write the CSV issue log at all.
    /// Default: true
    pub write_issue_log: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            occupancy_file: DEFAULT_OCCUPANCY_FILE.to_string(),
            revenue_file: DEFAULT_REVENUE_FILE.to_string(),
            member_file: DEFAULT_MEMBER_FILE.to_string(),
            issue_log_path: PathBuf::from(DEFAULT_ISSUE_LOG),
            write_issue_log: true,
        }
    }
}

impl RunConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    pub fn occupancy_path(&self) -> PathBuf {
        self.data_dir.join(&self.occupancy_file)
    }

    pub fn revenue_path(&self) -> PathBuf {
        self.data_dir.join(&self.revenue_file)
    }

    pub fn member_path(&self) -> PathBuf {
        self.data_dir.join(&self.member_file)
    }

    /// Paths of every required input, in load order.
    pub fn input_paths(&self) -> [PathBuf; 3] {
        [self.occupancy_path(), self.revenue_path(), self.member_path()]
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("occupancy_file", &self.occupancy_file),
            ("revenue_file", &self.revenue_file),
            ("member_file", &self.member_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFileName(field.to_string()));
            }
        }

        if self.issue_log_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyIssueLogPath);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid file name for '{0}': must not be empty")]
    EmptyFileName(String),

    #[error("Invalid issue log path: must not be empty")]
    EmptyIssueLogPath,
}

/// Builder for [`RunConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    data_dir: Option<PathBuf>,
    occupancy_file: Option<String>,
    revenue_file: Option<String>,
    member_file: Option<String>,
    issue_log_path: Option<PathBuf>,
    write_issue_log: Option<bool>,
}

impl RunConfigBuilder {
    /// Set the directory the input tables are read from.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn occupancy_file(mut self, name: impl Into<String>) -> Self {
        self.occupancy_file = Some(name.into());
        self
    }

    pub fn revenue_file(mut self, name: impl Into<String>) -> Self {
        self.revenue_file = Some(name.into());
        self
    }

    pub fn member_file(mut self, name: impl Into<String>) -> Self {
        self.member_file = Some(name.into());
        self
    }

    /// Set where the CSV issue log is written.
    pub fn issue_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.issue_log_path = Some(path.into());
        self
    }

    /// Enable or disable writing the CSV issue log.
    pub fn write_issue_log(mut self, enabled: bool) -> Self {
        self.write_issue_log = Some(enabled);
        self
    }

    /// Build the configuration, validating all values.
    pub fn build(self) -> Result<RunConfig, ConfigValidationError> {
        let defaults = RunConfig::default();

        let config = RunConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            occupancy_file: self.occupancy_file.unwrap_or(defaults.occupancy_file),
            revenue_file: self.revenue_file.unwrap_or(defaults.revenue_file),
            member_file: self.member_file.unwrap_or(defaults.member_file),
            issue_log_path: self.issue_log_path.unwrap_or(defaults.issue_log_path),
            write_issue_log: self.write_issue_log.unwrap_or(defaults.write_issue_log),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.issue_log_path, PathBuf::from("data_quality_report.csv"));
        assert!(config.write_issue_log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = RunConfig::builder()
            .data_dir("data")
            .member_file("members.csv")
            .write_issue_log(false)
            .build()
            .unwrap();

        assert_eq!(config.member_path(), PathBuf::from("data/members.csv"));
        assert_eq!(config.occupancy_path(), PathBuf::from("data/occupancy_data.csv"));
        assert!(!config.write_issue_log);
    }

    #[test]
    fn test_input_paths_order() {
        let config = RunConfig::builder().data_dir("in").build().unwrap();
        let paths = config.input_paths();
        assert_eq!(paths[0], PathBuf::from("in/occupancy_data.csv"));
        assert_eq!(paths[1], PathBuf::from("in/revenue_data.csv"));
        assert_eq!(paths[2], PathBuf::from("in/member_data.csv"));
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let result = RunConfig::builder().revenue_file("  ").build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::EmptyFileName(ref field)) if field == "revenue_file"
        ));
    }

    #[test]
    fn test_empty_issue_log_rejected() {
        let result = RunConfig::builder().issue_log_path("").build();
        assert!(matches!(result, Err(ConfigValidationError::EmptyIssueLogPath)));
    }
}
