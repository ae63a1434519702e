//! Stable column sorting for [`crate::types::DataSet`].

use std::cmp::Ordering;

use crate::error::{DatasetError, DatasetResult};
use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] with rows ordered by `column`.
///
/// Numbers order numerically (integers and floats compare with each other), text orders by
/// byte value. The sort is stable in both directions: rows with equal keys keep their relative
/// order. `Null` keys always go last.
pub fn sort(dataset: &DataSet, column: &str, ascending: bool) -> DatasetResult<DataSet> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| DatasetError::unknown_column(column))?;
    let mut rows = dataset.rows.clone();
    sort_rows(&mut rows, idx, ascending);
    Ok(DataSet::new(dataset.schema.clone(), rows))
}

/// Sort `rows` in place by the cell at `idx`.
pub(crate) fn sort_rows(rows: &mut [Vec<Value>], idx: usize, ascending: bool) {
    rows.sort_by(|a, b| compare_cells(&a[idx], &b[idx], ascending));
}

fn compare_cells(a: &Value, b: &Value, ascending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if ascending => a.total_cmp(b),
        (false, false) => b.total_cmp(a),
    }
}
