//! Parsing of user-typed text into typed values.
//!
//! Presentation layers collect bounds, positions and new rows as strings. These helpers turn them
//! into [`Value`]s or fail with [`DatasetError::Validation`] naming the offending input, before
//! anything touches the dataset.

use crate::error::{DatasetError, DatasetResult};
use crate::types::{DataType, Schema, Value};

fn invalid(input: &str, message: impl Into<String>) -> DatasetError {
    DatasetError::Validation {
        input: input.to_owned(),
        message: message.into(),
    }
}

fn non_empty<'a>(input: &str, raw: &'a str) -> DatasetResult<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid(input, "a value is required"));
    }
    Ok(trimmed)
}

/// Parse an integer; `input` names the field in the error.
pub fn parse_int(input: &str, raw: &str) -> DatasetResult<i64> {
    let trimmed = non_empty(input, raw)?;
    trimmed
        .parse()
        .map_err(|_| invalid(input, format!("'{trimmed}' is not an integer")))
}

/// Parse a finite number; `input` names the field in the error.
pub fn parse_float(input: &str, raw: &str) -> DatasetResult<f64> {
    let trimmed = non_empty(input, raw)?;
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(input, format!("'{trimmed}' is not a number"))),
    }
}

/// Parse a row position for [`crate::table::TabularDataset::insert_at`].
///
/// Only the syntax is checked here; a negative or too-large position is reported by `insert_at`
/// as [`DatasetError::Range`].
pub fn parse_index(raw: &str) -> DatasetResult<i64> {
    parse_int("index", raw)
}

/// Parse `raw` as a value of `data_type`. Text is trimmed and must not be empty.
pub fn parse_value(input: &str, raw: &str, data_type: DataType) -> DatasetResult<Value> {
    match data_type {
        DataType::Int64 => parse_int(input, raw).map(Value::Int64),
        DataType::Float64 => parse_float(input, raw).map(Value::Float64),
        DataType::Utf8 => non_empty(input, raw).map(Value::from),
    }
}

/// Build a full row from `(column, text)` pairs, in schema order.
///
/// Columns not mentioned are `Null`. Every given value is parsed as its column's type.
///
/// # Errors
///
/// [`DatasetError::Schema`] for an unknown column, [`DatasetError::Validation`] for text that
/// does not parse.
pub fn parse_record(schema: &Schema, fields: &[(&str, &str)]) -> DatasetResult<Vec<Value>> {
    let mut row = vec![Value::Null; schema.len()];
    for (column, raw) in fields {
        let idx = schema
            .index_of(column)
            .ok_or_else(|| DatasetError::unknown_column(column))?;
        row[idx] = parse_value(column, raw, schema.fields[idx].data_type)?;
    }
    Ok(row)
}

/// Like [`parse_record`], but every column not listed in `computed` must be given.
///
/// `computed` names columns the dataset fills itself, such as derived columns; text given for
/// them is still parsed but may be left out.
///
/// # Errors
///
/// [`DatasetError::Validation`] naming the first schema column with no (or blank) text, plus the
/// errors of [`parse_record`].
pub fn parse_complete_record(
    schema: &Schema,
    fields: &[(&str, &str)],
    computed: &[&str],
) -> DatasetResult<Vec<Value>> {
    let missing = schema.field_names().find(|name| {
        !computed.contains(name)
            && !fields
                .iter()
                .any(|(column, raw)| column == name && !raw.trim().is_empty())
    });
    if let Some(name) = missing {
        return Err(invalid(name, "all fields are required"));
    }
    parse_record(schema, fields)
}
