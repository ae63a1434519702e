use thiserror::Error;

/// Convenience result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by [`crate::table::TabularDataset`] and the processing functions.
///
/// Empty query results are never errors: `select` returns an empty [`crate::types::DataSet`] and
/// `delete_where` returns `0`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    /// An unknown column was referenced, or a value/row does not fit the schema.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Positional insertion outside `0..=len`.
    #[error("index {index} out of range: position must be between 0 and {len}")]
    Range { index: i64, len: usize },

    /// Malformed or non-numeric user input.
    #[error("invalid {input}: {message}")]
    Validation { input: String, message: String },

    /// Unknown aggregate function name.
    #[error("unsupported aggregate '{name}' (expected count, sum, mean, min or max)")]
    UnsupportedAggregate { name: String },

    /// Statistics were requested over zero rows.
    #[error("cannot compute statistics for column '{column}': no values")]
    EmptyDataset { column: String },
}

impl DatasetError {
    pub(crate) fn unknown_column(column: &str) -> Self {
        DatasetError::Schema {
            message: format!("unknown column '{column}'"),
        }
    }
}

/// Error type returned by ingestion functions.
///
/// A single error enum shared across CSV, JSON and (feature-gated) remote loading.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "remote")]
    /// HTTP transport or status error (feature-gated behind `remote`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
