//! Unified load entrypoint.
//!
//! Most callers go through [`crate::table::TabularDataset::load_or_empty`], which wraps [`load`]
//! and falls back to an empty dataset. Call [`load`] directly to see the error.
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the path or URL
//!   extension (URLs without one default to CSV).
//! - If a [`LoadObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};
use super::{csv, json};

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where the initial rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A local file.
    Path(PathBuf),
    /// Text already in memory, parsed with the configured format (CSV by default).
    Text(String),
    /// A remote resource fetched with a blocking GET (requires the `remote` feature).
    Url(String),
}

impl DataSource {
    /// Convenience constructor for [`DataSource::Path`].
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// Convenience constructor for [`DataSource::Url`].
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Text(t) => write!(f, "<inline text, {} bytes>", t.len()),
            DataSource::Url(u) => f.write_str(u),
        }
    }
}

/// Options controlling how a source is loaded.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the path/URL extension.
    pub format: Option<SourceFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load `source` into a [`DataSet`] shaped by `schema`.
///
/// This is a one-shot blocking call; nothing is retried. When an observer is configured it
/// receives:
///
/// - `on_success` with row count stats
/// - `on_failure` with a computed severity
/// - `on_alert` when that severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use rust_tabular::ingestion::{load, DataSource, LoadOptions};
/// use rust_tabular::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), rust_tabular::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("Symbol", DataType::Utf8),
///     Field::new("Price", DataType::Float64),
/// ]);
/// let ds = load(&DataSource::path("stocks.csv"), &schema, &LoadOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load(source: &DataSource, schema: &Schema, options: &LoadOptions) -> IngestionResult<DataSet> {
    let format = match options.format {
        Some(f) => Ok(f),
        None => infer_format(source),
    };

    let ctx = LoadContext {
        source: source.to_string(),
        format: format.as_ref().copied().unwrap_or(SourceFormat::Csv),
    };

    let result = format.and_then(|format| match source {
        DataSource::Path(path) => match format {
            SourceFormat::Csv => csv::ingest_csv_from_path(path, schema),
            SourceFormat::Json => json::ingest_json_from_path(path, schema),
        },
        DataSource::Text(text) => parse_text(text, format, schema),
        DataSource::Url(url) => fetch_url(url, format, schema),
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(&ctx, LoadStats { rows: ds.row_count() }),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn parse_text(text: &str, format: SourceFormat, schema: &Schema) -> IngestionResult<DataSet> {
    match format {
        SourceFormat::Csv => csv::ingest_csv_from_str(text, schema),
        SourceFormat::Json => json::ingest_json_from_str(text, schema),
    }
}

fn fetch_url(url: &str, format: SourceFormat, schema: &Schema) -> IngestionResult<DataSet> {
    #[cfg(feature = "remote")]
    {
        let body = super::remote::fetch_text(url)?;
        parse_text(&body, format, schema)
    }

    #[cfg(not(feature = "remote"))]
    {
        let _ = (format, schema);
        Err(IngestionError::SchemaMismatch {
            message: format!("cannot fetch '{url}': remote loading not enabled (enable cargo feature 'remote')"),
        })
    }
}

fn severity_for_error(e: &IngestionError) -> LoadSeverity {
    match e {
        IngestionError::Io(_) => LoadSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        #[cfg(feature = "remote")]
        IngestionError::Http(_) => LoadSeverity::Critical,
        IngestionError::SchemaMismatch { .. } | IngestionError::ParseError { .. } => LoadSeverity::Error,
    }
}

fn infer_format(source: &DataSource) -> IngestionResult<SourceFormat> {
    match source {
        DataSource::Text(_) => Ok(SourceFormat::Csv),
        DataSource::Url(url) => {
            let last = url
                .split(['?', '#'])
                .next()
                .and_then(|p| p.rsplit('/').next())
                .unwrap_or("");
            Ok(Path::new(last)
                .extension()
                .and_then(|s| s.to_str())
                .and_then(SourceFormat::from_extension)
                .unwrap_or(SourceFormat::Csv))
        }
        DataSource::Path(path) => {
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .ok_or_else(|| IngestionError::SchemaMismatch {
                    message: format!(
                        "cannot infer format: path has no extension ({})",
                        path.display()
                    ),
                })?;

            SourceFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!(
                    "cannot infer format from extension '{ext}' for path ({})",
                    path.display()
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{infer_format, severity_for_error, DataSource, SourceFormat};
    use crate::error::IngestionError;
    use crate::ingestion::observability::LoadSeverity;

    #[test]
    fn infer_format_from_path_and_url() {
        assert_eq!(
            infer_format(&DataSource::path("a/b/employees.JSON")).unwrap(),
            SourceFormat::Json
        );
        assert!(infer_format(&DataSource::path("README")).is_err());
        assert!(infer_format(&DataSource::path("data.parquet")).is_err());
        assert_eq!(
            infer_format(&DataSource::url("https://example.com/datasets/employee.csv?raw=1")).unwrap(),
            SourceFormat::Csv
        );
        assert_eq!(
            infer_format(&DataSource::url("https://example.com/feed.ndjson")).unwrap(),
            SourceFormat::Json
        );
        assert_eq!(
            infer_format(&DataSource::url("https://example.com/export")).unwrap(),
            SourceFormat::Csv
        );
    }

    #[test]
    fn unreadable_sources_outrank_bad_content() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(severity_for_error(&IngestionError::Io(missing)), LoadSeverity::Critical);

        let bad_cell = IngestionError::ParseError {
            row: 2,
            column: "Price".to_string(),
            raw: "cheap".to_string(),
            message: "'cheap' is not a number".to_string(),
        };
        assert_eq!(severity_for_error(&bad_cell), LoadSeverity::Error);
        let mismatch = IngestionError::SchemaMismatch {
            message: "missing required column(s) 'PE'".to_string(),
        };
        assert_eq!(severity_for_error(&mismatch), LoadSeverity::Error);
    }

    #[test]
    fn display_describes_source() {
        assert_eq!(DataSource::Text("a,b\n".into()).to_string(), "<inline text, 4 bytes>");
        assert_eq!(DataSource::url("https://x/y.csv").to_string(), "https://x/y.csv");
    }
}
