//! CSV ingestion.
//!
//! Headers are matched to schema fields by name, ignoring surrounding whitespace and a leading
//! byte-order mark. Columns the schema does not mention are skipped. A blank cell, or a record
//! too short to reach a column, becomes `Null`; anything else is parsed with the same rules as
//! typed user input ([`crate::input::parse_value`]).

use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::error::{DatasetError, IngestionError, IngestionResult};
use crate::input;
use crate::types::{DataSet, Field, Schema, Value};

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Read a CSV file with a header row into a [`DataSet`] shaped by `schema`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    ingest_csv_from_reader(&mut reader_builder().from_path(path)?, schema)
}

/// Read CSV text already in memory, such as a downloaded response body.
pub fn ingest_csv_from_str(input: &str, schema: &Schema) -> IngestionResult<DataSet> {
    ingest_csv_from_reader(&mut reader_builder().from_reader(input.as_bytes()), schema)
}

/// Read from a caller-configured [`csv::Reader`]. The reader must have headers enabled.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut Reader<R>, schema: &Schema) -> IngestionResult<DataSet> {
    let positions = header_positions(rdr.headers()?, schema)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let record = record?;
        let row = schema
            .fields
            .iter()
            .zip(&positions)
            .map(|(field, &pos)| parse_cell(line, field, record.get(pos).unwrap_or("")))
            .collect::<IngestionResult<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(DataSet::new(schema.clone(), rows))
}

/// CSV position of every schema field, in schema order.
///
/// All absent fields are reported together.
fn header_positions(headers: &StringRecord, schema: &Schema) -> IngestionResult<Vec<usize>> {
    let names: Vec<&str> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    let mut positions = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();
    for field in &schema.fields {
        match names.iter().position(|h| *h == field.name) {
            Some(pos) => positions.push(pos),
            None => missing.push(format!("'{}'", field.name)),
        }
    }

    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(IngestionError::SchemaMismatch {
            message: format!(
                "missing required column(s) {}; found {names:?}",
                missing.join(", ")
            ),
        })
    }
}

fn parse_cell(line: usize, field: &Field, raw: &str) -> IngestionResult<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    input::parse_value(&field.name, raw, field.data_type).map_err(|err| IngestionError::ParseError {
        row: line,
        column: field.name.clone(),
        raw: raw.to_owned(),
        message: match err {
            DatasetError::Validation { message, .. } => message,
            other => other.to_string(),
        },
    })
}
