//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Records are flat. A key absent from a record, or an explicit `null`, becomes `Value::Null`;
//! keys not in the schema are ignored.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value as Json};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Ingest a JSON file into an in-memory [`DataSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Ingest JSON or NDJSON text into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DataSet::empty(schema.clone()));
    }

    let records: Vec<Json> = match serde_json::from_str::<Json>(trimmed) {
        Ok(Json::Array(items)) => items,
        Ok(obj @ Json::Object(_)) => vec![obj],
        Ok(_) => {
            return Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            });
        }
        Err(_) => trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<Json>(line).map_err(|e| IngestionError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {e}", i + 1),
                })
            })
            .collect::<IngestionResult<_>>()?,
    };

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| record_to_row(i + 1, record, schema))
        .collect::<IngestionResult<Vec<_>>>()?;
    Ok(DataSet::new(schema.clone(), rows))
}

fn record_to_row(row: usize, record: &Json, schema: &Schema) -> IngestionResult<Vec<Value>> {
    let obj: &Map<String, Json> = record.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!("row {row} is not a json object"),
    })?;

    schema
        .fields
        .iter()
        .map(|field| match obj.get(&field.name) {
            None | Some(Json::Null) => Ok(Value::Null),
            Some(v) => convert(v, field.data_type).ok_or_else(|| IngestionError::ParseError {
                row,
                column: field.name.clone(),
                raw: v.to_string(),
                message: format!("expected {:?}", field.data_type),
            }),
        })
        .collect()
}

/// Numbers given as strings are accepted for numeric columns, and scalars are accepted as text.
fn convert(v: &Json, data_type: DataType) -> Option<Value> {
    match (data_type, v) {
        (DataType::Utf8, Json::String(s)) => Some(Value::Utf8(s.clone())),
        (DataType::Utf8, Json::Number(n)) => Some(Value::Utf8(n.to_string())),
        (DataType::Utf8, Json::Bool(b)) => Some(Value::Utf8(b.to_string())),
        (DataType::Int64, Json::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_i64))
            .map(Value::Int64),
        (DataType::Int64, Json::String(s)) => s.trim().parse().ok().map(Value::Int64),
        (DataType::Float64, Json::Number(n)) => n.as_f64().map(Value::Float64),
        (DataType::Float64, Json::String(s)) => s.trim().parse().ok().map(Value::Float64),
        _ => None,
    }
}

/// A float with no fractional part that fits `i64`. `i64::MAX as f64` rounds up to 2^63, so the
/// upper bound is exclusive.
fn whole_i64(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}
