//! Loading of the input tables from CSV files.

use crate::config::RunConfig;
use crate::error::{QualityError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The three tables a run checks.
#[derive(Debug, Clone)]
pub struct InputTables {
    pub occupancy: DataFrame,
    pub revenue: DataFrame,
    pub member: DataFrame,
}

impl InputTables {
    /// Load every input named by `config`.
    ///
    /// Fails with [`QualityError::InputsNotFound`] before reading anything
    /// when any file is absent.
    pub fn load(config: &RunConfig) -> Result<Self> {
        ensure_inputs_exist(&config.input_paths())?;

        info!("Loading datasets from {}", config.data_dir.display());
        let tables = Self {
            occupancy: load_csv(&config.occupancy_path())?,
            revenue: load_csv(&config.revenue_path())?,
            member: load_csv(&config.member_path())?,
        };
        info!("All datasets loaded successfully");

        Ok(tables)
    }
}

/// Check that every path exists, reporting all the missing ones at once.
pub fn ensure_inputs_exist(paths: &[PathBuf]) -> Result<()> {
    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(QualityError::InputsNotFound { missing })
    }
}

/// Read a CSV file with a header row, inferring column types from all rows.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to read {}", path.display()))?;

    debug!("Loaded {}: {:?}", path.display(), df.shape());
    Ok(df)
}
