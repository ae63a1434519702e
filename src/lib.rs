//! `rust-tabular` is a small in-memory table engine: a typed [`types::DataSet`] wrapped by
//! [`table::TabularDataset`], which keeps derived columns up to date as rows are inserted,
//! updated, deleted and sorted.
//!
//! A presentation layer owns one [`TabularDataset`], forwards user intents to it and re-renders
//! from [`TabularDataset::snapshot`]. The dataset never calls back.
//!
//! ## Loading
//!
//! The initial rows come from a CSV or JSON file, inline text, or (with the Cargo feature
//! `remote`) a URL. [`TabularDataset::load_or_empty`] never fails: any load error is logged and
//! the dataset starts empty with the full schema.
//!
//! ```no_run
//! use rust_tabular::ingestion::{DataSource, LoadOptions};
//! use rust_tabular::samples;
//! use rust_tabular::TabularDataset;
//!
//! # fn main() -> Result<(), rust_tabular::DatasetError> {
//! let base = TabularDataset::load_or_empty(
//!     &DataSource::url(samples::EMPLOYEE_CSV_URL),
//!     &samples::employee_schema(),
//!     &LoadOptions::default(),
//! );
//! let employees = samples::employee_dataset(base, samples::current_year())?;
//! println!("rows={}", employees.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with a dataset
//!
//! ```rust
//! use rust_tabular::processing::{predicate, ReduceOp};
//! use rust_tabular::samples;
//! use rust_tabular::types::Value;
//!
//! # fn main() -> Result<(), rust_tabular::DatasetError> {
//! let mut stocks = samples::stock_dataset()?;
//!
//! let tech = predicate::equals(stocks.schema(), "Group", "Tech")?;
//! assert_eq!(stocks.select(tech).row_count(), 5);
//!
//! stocks.sort("Price", true, true)?;
//! assert_eq!(stocks.rows()[0][0], Value::from("AMZN"));
//!
//! let by_group = stocks.group_by("Group", ReduceOp::Count)?;
//! assert_eq!(by_group.rows[0][0], Value::from("Retail"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`table`]: the mutable dataset and its operations
//! - [`derive`]: derived-column registry and dependency ordering
//! - [`processing`]: filter/sort/reduce/group/statistics over [`types::DataSet`] snapshots
//! - [`ingestion`]: best-effort initial load and observer hooks
//! - [`input`]: parsing user-typed text into values
//! - [`samples`]: the stock, employee and random-array datasets
//! - [`types`]: schema and value types
//! - [`error`]: error types

pub mod derive;
pub mod error;
pub mod ingestion;
pub mod input;
pub mod processing;
pub mod samples;
pub mod table;
pub mod types;

pub use error::{DatasetError, DatasetResult, IngestionError, IngestionResult};
pub use table::TabularDataset;
