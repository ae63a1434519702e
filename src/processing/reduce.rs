//! Reduction operations for [`crate::types::DataSet`].

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::{DatasetError, DatasetResult};
use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

impl ReduceOp {
    /// All operations, in the order they are usually offered to users.
    pub const ALL: [ReduceOp; 5] = [
        ReduceOp::Mean,
        ReduceOp::Sum,
        ReduceOp::Count,
        ReduceOp::Min,
        ReduceOp::Max,
    ];

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ReduceOp::Count => "count",
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReduceOp {
    type Err = DatasetError;

    /// Parse an aggregate name (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(ReduceOp::Count),
            "sum" => Ok(ReduceOp::Sum),
            "mean" | "avg" => Ok(ReduceOp::Mean),
            "min" => Ok(ReduceOp::Min),
            "max" => Ok(ReduceOp::Max),
            _ => Err(DatasetError::UnsupportedAggregate { name: s.to_owned() }),
        }
    }
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Fails with [`DatasetError::Schema`] if `column` does not exist.
/// - `Count` always returns `Value::Int64(row_count)`.
/// - `Sum`/`Min`/`Max` keep the column type; `Mean` returns `Float64`.
/// - Numeric ops return `Value::Null` if there are no non-null values, or if the column is text.
/// - An integer `Sum` that overflows `i64` is `Value::Null` and logs a warning.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> DatasetResult<Value> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| DatasetError::unknown_column(column))?;
    let data_type = dataset.schema.fields[idx].data_type;

    Ok(match op {
        ReduceOp::Count => Value::Int64(dataset.row_count() as i64),
        ReduceOp::Mean => mean(dataset, idx),
        ReduceOp::Sum if data_type == DataType::Int64 => sum_i64(dataset, idx, column),
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max => {
            reduce_numeric_typed(dataset, idx, data_type, op)
        }
    })
}

fn mean(dataset: &DataSet, idx: usize) -> Value {
    let (sum, n) = dataset.reduce_rows((0.0_f64, 0_usize), |(sum, n), row| {
        match row.get(idx).and_then(Value::as_f64) {
            Some(v) => (sum + v, n + 1),
            None => (sum, n),
        }
    });
    if n == 0 {
        Value::Null
    } else {
        Value::Float64(sum / n as f64)
    }
}

fn sum_i64(dataset: &DataSet, idx: usize, column: &str) -> Value {
    let mut total: Option<i64> = None;
    for row in &dataset.rows {
        let Some(Value::Int64(v)) = row.get(idx) else {
            continue;
        };
        match total.unwrap_or(0).checked_add(*v) {
            Some(t) => total = Some(t),
            None => {
                warn!(column, "integer sum overflows i64; reporting null");
                return Value::Null;
            }
        }
    }
    total.map(Value::Int64).unwrap_or(Value::Null)
}

fn reduce_numeric_typed(dataset: &DataSet, idx: usize, data_type: DataType, op: ReduceOp) -> Value {
    match data_type {
        DataType::Int64 => {
            let mut acc: Option<i64> = None;
            for row in &dataset.rows {
                if let Some(Value::Int64(v)) = row.get(idx) {
                    acc = Some(match (op, acc) {
                        (ReduceOp::Min, Some(a)) => a.min(*v),
                        (ReduceOp::Max, Some(a)) => a.max(*v),
                        (_, _) => *v,
                    });
                }
            }
            acc.map(Value::Int64).unwrap_or(Value::Null)
        }
        DataType::Float64 => {
            let mut acc: Option<f64> = None;
            for row in &dataset.rows {
                if let Some(Value::Float64(v)) = row.get(idx) {
                    acc = Some(match (op, acc) {
                        (ReduceOp::Sum, Some(a)) => a + v,
                        (ReduceOp::Min, Some(a)) => a.min(*v),
                        (ReduceOp::Max, Some(a)) => a.max(*v),
                        (_, _) => *v,
                    });
                }
            }
            acc.map(Value::Float64).unwrap_or(Value::Null)
        }
        DataType::Utf8 => Value::Null,
    }
}
