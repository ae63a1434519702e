//! Loading the initial rows of a dataset.
//!
//! Most callers go through [`crate::table::TabularDataset::load_or_empty`]. [`load`] (from
//! [`unified`]) is the fallible form underneath it:
//!
//! - picks CSV or JSON by extension (override with [`LoadOptions::format`])
//! - reads a local path, inline text, or (feature `remote`) a URL
//! - optionally reports the outcome to a [`LoadObserver`]
//!
//! Format-specific functions are also available under [`csv`] and [`json`].

pub mod csv;
pub mod json;
pub mod observability;
#[cfg(feature = "remote")]
pub mod remote;
pub mod unified;

pub use observability::{
    CompositeObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver,
};
pub use unified::{load, DataSource, LoadOptions, SourceFormat};
