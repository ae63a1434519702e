//! Grouped aggregation for [`crate::types::DataSet`].

use crate::error::{DatasetError, DatasetResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::reduce::{reduce, ReduceOp};

/// Partition rows by `key_column` and reduce every other column within each group.
///
/// The output has one row per distinct key, in order of first occurrence, with the key column
/// first. A `Null` key forms its own group.
///
/// - [`ReduceOp::Count`] keeps every non-key column and reports the group's row count in each,
///   as `Int64`, regardless of the column type.
/// - `Sum`/`Mean`/`Min`/`Max` keep only numeric non-key columns; text columns are dropped from
///   the output. Nulls are ignored and an all-null group yields `Null`.
pub fn group_by(dataset: &DataSet, key_column: &str, op: ReduceOp) -> DatasetResult<DataSet> {
    let key_idx = dataset
        .schema
        .index_of(key_column)
        .ok_or_else(|| DatasetError::unknown_column(key_column))?;

    let value_fields: Vec<&Field> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(i, f)| *i != key_idx && (op == ReduceOp::Count || f.data_type.is_numeric()))
        .map(|(_, f)| f)
        .collect();

    let mut out_fields = vec![dataset.schema.fields[key_idx].clone()];
    out_fields.extend(
        value_fields
            .iter()
            .map(|f| Field::new(f.name.clone(), output_type(f.data_type, op))),
    );

    let mut rows = Vec::new();
    for (key, members) in partition(dataset, key_idx) {
        let group = DataSet::new(dataset.schema.clone(), members);
        let mut row = Vec::with_capacity(out_fields.len());
        row.push(key);
        for field in &value_fields {
            row.push(reduce(&group, &field.name, op)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(Schema::new(out_fields), rows))
}

fn output_type(input: DataType, op: ReduceOp) -> DataType {
    match op {
        ReduceOp::Count => DataType::Int64,
        ReduceOp::Mean => DataType::Float64,
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max => input,
    }
}

/// Split rows into `(key, rows)` groups in first-seen key order.
///
/// Linear key lookup keeps the first-seen order without requiring `Hash` on floats; the
/// datasets this serves are small.
fn partition(dataset: &DataSet, key_idx: usize) -> Vec<(Value, Vec<Vec<Value>>)> {
    let mut groups: Vec<(Value, Vec<Vec<Value>>)> = Vec::new();
    for row in &dataset.rows {
        let key = &row[key_idx];
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, members)) => members.push(row.clone()),
            None => groups.push((key.clone(), vec![row.clone()])),
        }
    }
    groups
}
