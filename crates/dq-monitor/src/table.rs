//! Tabular input abstraction.
//!
//! The quality rules only need a handful of capabilities from a table, so
//! they are written against the [`Table`] trait rather than a concrete frame
//! type. [`DataFrame`] is the implementation used by the loader.

use crate::error::{QualityError, Result};
use crate::utils::{DtypeCategory, get_dtype_category, is_numeric_dtype, parse_date_string};
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Read-only view of a table consumed by the quality rules.
pub trait Table {
    /// Number of rows at the time of the call.
    fn row_count(&self) -> usize;

    /// Column names in table order.
    fn column_names(&self) -> Vec<String>;

    fn has_column(&self, column: &str) -> bool {
        self.column_names().iter().any(|name| name == column)
    }

    /// Number of missing cells in `column`: nulls, plus NaN in float columns.
    fn missing_count(&self, column: &str) -> Result<usize>;

    /// Number of rows repeating an earlier row across `subset`, or across
    /// all columns when `subset` is `None`. Nulls compare equal.
    fn duplicate_count(&self, subset: Option<&[&str]>) -> Result<usize>;

    /// Values of `column` as floats, or `None` when the column is not numeric.
    fn numeric_column(&self, column: &str) -> Result<Option<Vec<Option<f64>>>>;

    /// Values of `column` coerced to datetimes.
    ///
    /// Nulls stay `None`. Any non-null value that cannot be coerced fails
    /// the whole column with [`QualityError::DateParse`].
    fn date_column(&self, column: &str) -> Result<Vec<Option<NaiveDateTime>>>;

    /// Textual rendering of every value in `column`, used for equality
    /// comparisons across rows and tables.
    fn text_column(&self, column: &str) -> Result<Vec<Option<String>>>;
}

fn series<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Series> {
    df.column(column)
        .map(|col| col.as_materialized_series())
        .map_err(|_| QualityError::ColumnNotFound(column.to_string()))
}

impl Table for DataFrame {
    fn row_count(&self) -> usize {
        self.height()
    }

    fn column_names(&self) -> Vec<String> {
        self.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn has_column(&self, column: &str) -> bool {
        self.column(column).is_ok()
    }

    fn missing_count(&self, column: &str) -> Result<usize> {
        let series = series(self, column)?;
        let nan_count = if series.dtype().is_float() {
            let float_series = series.cast(&DataType::Float64)?;
            float_series
                .f64()?
                .into_iter()
                .filter(|v| v.is_some_and(f64::is_nan))
                .count()
        } else {
            0
        };

        Ok(series.null_count() + nan_count)
    }

    fn duplicate_count(&self, subset: Option<&[&str]>) -> Result<usize> {
        let subset: Option<Vec<String>> = match subset {
            Some(cols) => {
                if let Some(missing) = cols.iter().find(|col| !Table::has_column(self, col)) {
                    return Err(QualityError::ColumnNotFound(missing.to_string()));
                }
                Some(cols.iter().map(|col| col.to_string()).collect())
            }
            None => None,
        };

        let unique = self.unique::<&str, &str>(subset.as_deref(), UniqueKeepStrategy::First, None)?;
        Ok(self.height() - unique.height())
    }

    fn numeric_column(&self, column: &str) -> Result<Option<Vec<Option<f64>>>> {
        let series = series(self, column)?;
        if !is_numeric_dtype(series.dtype()) {
            return Ok(None);
        }

        let float_series = series.cast(&DataType::Float64)?;
        let values = float_series.f64()?.into_iter().collect();
        Ok(Some(values))
    }

    fn date_column(&self, column: &str) -> Result<Vec<Option<NaiveDateTime>>> {
        let series = series(self, column)?;
        match get_dtype_category(series.dtype()) {
            DtypeCategory::Datetime | DtypeCategory::String => {}
            _ => {
                return Err(QualityError::DateParse {
                    column: column.to_string(),
                    reason: format!("column has non-temporal type {}", series.dtype()),
                });
            }
        }

        let str_series = series.cast(&DataType::String)?;
        let mut values = Vec::with_capacity(str_series.len());
        for (row, opt_val) in str_series.str()?.into_iter().enumerate() {
            match opt_val {
                Some(raw) => match parse_date_string(raw) {
                    Some(parsed) => values.push(Some(parsed)),
                    None => {
                        return Err(QualityError::DateParse {
                            column: column.to_string(),
                            reason: format!("unrecognised date value '{}' at row {}", raw, row),
                        });
                    }
                },
                None => values.push(None),
            }
        }

        Ok(values)
    }

    fn text_column(&self, column: &str) -> Result<Vec<Option<String>>> {
        let str_series = series(self, column)?.cast(&DataType::String)?;
        let values = str_series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }
}
