//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] snapshots and never mutates its
//! input. [`crate::table::TabularDataset`] builds its queries on these functions; they are also
//! usable directly on a filtered view.
//!
//! Currently implemented:
//!
//! - [`filter()`]: row filtering by predicate, with builders in [`predicate`]
//! - [`sort()`]: stable ascending/descending sort by one column
//! - [`reduce()`]: count/sum/mean/min/max over one column
//! - [`group_by()`]: the same reductions applied per group
//! - [`statistics()`]: min/max/mean/median/standard deviation
//!
//! ## Example: filter → statistics
//!
//! ```rust
//! use rust_tabular::processing::{filter, predicate, statistics};
//! use rust_tabular::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![Field::new("value", DataType::Int64)]);
//! let ds = DataSet::new(
//!     schema,
//!     [-40, 12, 250, 7, -3].iter().map(|v| vec![Value::Int64(*v)]).collect(),
//! );
//!
//! let non_negative = predicate::non_negative(&ds.schema, "value").unwrap();
//! let kept = filter(&ds, non_negative);
//! assert_eq!(kept.row_count(), 3);
//!
//! let stats = statistics(&kept, "value").unwrap();
//! assert_eq!(stats.min, 7.0);
//! assert_eq!(stats.median, 12.0);
//! ```

pub mod filter;
pub mod group;
pub mod predicate;
pub mod reduce;
pub mod sort;
pub mod stats;

pub use filter::filter;
pub use group::group_by;
pub use reduce::{reduce, ReduceOp};
pub use sort::sort;
pub use stats::{statistics, ColumnStatistics};
