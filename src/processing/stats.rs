//! Descriptive statistics over a numeric column.

use std::fmt;

use serde::Serialize;

use crate::error::{DatasetError, DatasetResult};
use crate::types::DataSet;

/// Summary of a numeric column. Nulls are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStatistics {
    /// Number of non-null values summarized.
    pub count: usize,
    /// Smallest value, as `f64` even for integer columns.
    pub min: f64,
    /// Largest value, as `f64` even for integer columns.
    pub max: f64,
    /// Arithmetic mean of the `count` values.
    pub mean: f64,
    /// Middle value; the mean of the two middle values for an even count.
    pub median: f64,
    /// Population standard deviation (divisor `n`).
    pub std_dev: f64,
}

impl fmt::Display for ColumnStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={}, min={}, max={}, mean={:.4}, median={}, std={:.4}",
            self.count, self.min, self.max, self.mean, self.median, self.std_dev
        )
    }
}

/// Compute [`ColumnStatistics`] for `column`.
///
/// Works on any [`DataSet`], including the output of a filter, so callers can summarize a
/// selection directly.
///
/// # Errors
///
/// - [`DatasetError::Schema`] if the column is unknown or not numeric.
/// - [`DatasetError::EmptyDataset`] if there are no rows or every value is null.
pub fn statistics(dataset: &DataSet, column: &str) -> DatasetResult<ColumnStatistics> {
    let field = dataset
        .schema
        .field(column)
        .ok_or_else(|| DatasetError::unknown_column(column))?;
    if !field.data_type.is_numeric() {
        return Err(DatasetError::Schema {
            message: format!(
                "column '{column}' is {:?}; statistics need a numeric column",
                field.data_type
            ),
        });
    }

    let mut values: Vec<f64> = dataset
        .column_values(column)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_f64())
        .collect();
    if values.is_empty() {
        return Err(DatasetError::EmptyDataset {
            column: column.to_owned(),
        });
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };

    Ok(ColumnStatistics {
        count: n,
        min: values[0],
        max: values[n - 1],
        mean,
        median,
        std_dev: variance.sqrt(),
    })
}
