//! The mutable dataset owned by a presentation layer.
//!
//! [`TabularDataset`] wraps a [`DataSet`] and a registry of derived columns. It is the single
//! owner of its rows: callers issue operations against it and re-render from
//! [`TabularDataset::snapshot`]. It never calls back into its owner.
//!
//! ```rust
//! use rust_tabular::processing::predicate;
//! use rust_tabular::table::TabularDataset;
//! use rust_tabular::types::{DataType, Field, Schema, Value};
//!
//! # fn main() -> Result<(), rust_tabular::DatasetError> {
//! let schema = Schema::new(vec![
//!     Field::new("Symbol", DataType::Utf8),
//!     Field::new("Price", DataType::Float64),
//! ]);
//! let mut ds = TabularDataset::new(
//!     schema,
//!     vec![
//!         vec![Value::from("AAPL"), Value::Float64(180.5)],
//!         vec![Value::from("MSFT"), Value::Float64(350.2)],
//!     ],
//! )?;
//! ds.derive_column(Field::new("USD", DataType::Float64), &["Price"], |v| {
//!     v[0].as_f64().map(|p| p / 23.0).into()
//! })?;
//!
//! let is_aapl = predicate::equals(ds.schema(), "Symbol", "AAPL")?;
//! let halve = |v: &Value| -> Value { v.as_f64().map(|p| p / 2.0).into() };
//! assert_eq!(ds.update_field(is_aapl, "Price", halve)?, 1);
//! assert_eq!(ds.rows()[0][1], Value::Float64(90.25));
//! assert!((ds.rows()[0][2].as_f64().unwrap() - 90.25 / 23.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

use tracing::{debug, warn};

use crate::derive::{recompute, DerivedColumn, Derivations};
use crate::error::{DatasetError, DatasetResult};
use crate::ingestion::{load, DataSource, LoadOptions};
use crate::processing::{self, ColumnStatistics, ReduceOp};
use crate::types::{DataSet, Field, Schema, Value};

/// In-memory table with derived-column maintenance.
///
/// Invariants:
///
/// - every row has exactly one value per schema field, of the field's type (or `Null`);
/// - every derived column holds its formula applied to the current source values.
#[derive(Debug, Clone)]
pub struct TabularDataset {
    data: DataSet,
    derivations: Derivations,
}

impl TabularDataset {
    /// Create a dataset from a schema and rows.
    ///
    /// Each row must have one value per field. `Int64` values in `Float64` columns are widened;
    /// other type mismatches fail with [`DatasetError::Schema`].
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> DatasetResult<Self> {
        let rows = rows
            .into_iter()
            .map(|row| conform_row(&schema, row))
            .collect::<DatasetResult<Vec<_>>>()?;
        Ok(Self {
            data: DataSet::new(schema, rows),
            derivations: Derivations::default(),
        })
    }

    /// A dataset with the full `schema` and no rows.
    pub fn empty(schema: Schema) -> Self {
        Self {
            data: DataSet::empty(schema),
            derivations: Derivations::default(),
        }
    }

    /// Wrap an existing [`DataSet`], validating its rows.
    pub fn from_dataset(dataset: DataSet) -> DatasetResult<Self> {
        Self::new(dataset.schema, dataset.rows)
    }

    /// Load the initial rows from `source`, falling back to an empty dataset on any failure.
    ///
    /// The failure is reported to the configured observer and logged; it is never returned.
    /// An empty result due to failure is indistinguishable from a legitimately empty source.
    pub fn load_or_empty(source: &DataSource, schema: &Schema, options: &LoadOptions) -> Self {
        match load(source, schema, options) {
            // Ingestion parses every cell against `schema`, so rows already conform.
            Ok(data) => Self {
                data,
                derivations: Derivations::default(),
            },
            Err(error) => {
                warn!(%source, %error, "initial load failed; starting with an empty dataset");
                Self::empty(schema.clone())
            }
        }
    }

    /// Column schema, including derived columns.
    pub fn schema(&self) -> &Schema {
        &self.data.schema
    }

    /// Rows in their current order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.data.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.data.row_count()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the current schema and rows for rendering.
    pub fn snapshot(&self) -> &DataSet {
        &self.data
    }

    /// Give up derived-column tracking and return the rows.
    pub fn into_dataset(self) -> DataSet {
        self.data
    }

    /// Registered derived columns, in registration order.
    pub fn derived_columns(&self) -> &[DerivedColumn] {
        self.derivations.columns()
    }

    /// Register a computed column and fill it for every row.
    ///
    /// `formula` receives the values of `sources` (in the order given) and its result is stored
    /// in `field.name`. A new name is appended to the schema; an existing column is taken over and
    /// retyped to `field.data_type`. The column is recomputed whenever a source changes through
    /// [`Self::update_field`], and for every inserted row.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Schema`] if a source is unknown or the column would depend on itself.
    pub fn derive_column<F>(&mut self, field: Field, sources: &[&str], formula: F) -> DatasetResult<()>
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        if let Some(missing) = sources.iter().find(|s| self.data.schema.index_of(s).is_none()) {
            return Err(DatasetError::unknown_column(missing));
        }

        let name = field.name.clone();
        self.derivations
            .register(DerivedColumn::new(field.clone(), sources, formula))?;

        match self.data.schema.index_of(&name) {
            Some(idx) => self.data.schema.fields[idx].data_type = field.data_type,
            None => {
                self.data.schema.fields.push(field);
                for row in &mut self.data.rows {
                    row.push(Value::Null);
                }
            }
        }

        let affected = self.derivations.downstream_of(&name, true);
        recompute(&affected, &self.data.schema, &mut self.data.rows)?;
        debug!(column = %name, ?sources, rows = self.data.row_count(), "derived column registered");
        Ok(())
    }

    /// Rows for which `predicate` holds, in order. Never mutates; an empty result is not an error.
    pub fn select<F>(&self, predicate: F) -> DataSet
    where
        F: FnMut(&[Value]) -> bool,
    {
        processing::filter(&self.data, predicate)
    }

    /// Sort by `column`, ascending or descending, with a stable order and nulls last.
    ///
    /// With `apply`, the dataset's own row order is replaced; otherwise the dataset is left as is
    /// and only the returned view is sorted.
    pub fn sort(&mut self, column: &str, ascending: bool, apply: bool) -> DatasetResult<DataSet> {
        if !apply {
            return self.sorted(column, ascending);
        }
        let idx = self
            .data
            .schema
            .index_of(column)
            .ok_or_else(|| DatasetError::unknown_column(column))?;
        processing::sort::sort_rows(&mut self.data.rows, idx, ascending);
        debug!(%column, ascending, "rows sorted in place");
        Ok(self.data.clone())
    }

    /// A sorted copy of the rows; the dataset is not modified.
    pub fn sorted(&self, column: &str, ascending: bool) -> DatasetResult<DataSet> {
        processing::sort(&self.data, column, ascending)
    }

    /// Insert `row` at zero-based position `index` and compute its derived columns.
    ///
    /// `index == row_count()` appends. Values in derived columns are ignored and recomputed.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Range`] if `index < 0` or `index > row_count()`.
    /// - [`DatasetError::Schema`] if the row does not fit the schema.
    pub fn insert_at(&mut self, index: i64, row: Vec<Value>) -> DatasetResult<&DataSet> {
        let len = self.data.row_count();
        let pos = usize::try_from(index)
            .ok()
            .filter(|&p| p <= len)
            .ok_or(DatasetError::Range { index, len })?;

        let row = conform_row(&self.data.schema, row)?;
        self.data.rows.insert(pos, row);
        let ordered = self.derivations.ordered();
        recompute(&ordered, &self.data.schema, &mut self.data.rows[pos..=pos])?;
        debug!(index = pos, rows = self.data.row_count(), "row inserted");
        Ok(&self.data)
    }

    /// Insert a row given as `(column, value)` pairs. Omitted columns are `Null`.
    ///
    /// # Errors
    ///
    /// As [`Self::insert_at`], plus [`DatasetError::Schema`] for an unknown column name.
    pub fn insert_record(&mut self, index: i64, record: &[(&str, Value)]) -> DatasetResult<&DataSet> {
        let mut row = vec![Value::Null; self.data.schema.len()];
        for (column, value) in record {
            let idx = self
                .data
                .schema
                .index_of(column)
                .ok_or_else(|| DatasetError::unknown_column(column))?;
            row[idx] = value.clone();
        }
        self.insert_at(index, row)
    }

    /// Append `row` at the end. Equivalent to `insert_at(row_count(), row)`.
    pub fn append(&mut self, row: Vec<Value>) -> DatasetResult<&DataSet> {
        let end = i64::try_from(self.data.row_count()).unwrap_or(i64::MAX);
        self.insert_at(end, row)
    }

    /// Remove every row matching `predicate` and return how many were removed.
    ///
    /// Zero is a normal outcome, not an error.
    pub fn delete_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&[Value]) -> bool,
    {
        let before = self.data.row_count();
        self.data.rows.retain(|row| !predicate(row.as_slice()));
        let removed = before - self.data.row_count();
        debug!(removed, rows = self.data.row_count(), "rows deleted");
        removed
    }

    /// Remove rows matching a caller-supplied domain filter, such as
    /// [`processing::predicate::perfect_square`]. Same contract as [`Self::delete_where`].
    pub fn remove_matching<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.delete_where(predicate)
    }

    /// Replace `column` with `transform(value)` in every row matching `predicate`.
    ///
    /// Returns the number of rows updated. All new values are checked against the column type
    /// before any row changes. Afterwards every derived column reading `column`, directly or
    /// through other derived columns, is recomputed for all rows.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Schema`] if `column` is unknown, is a derived column, or a transformed
    /// value does not fit it.
    pub fn update_field<P, T>(&mut self, mut predicate: P, column: &str, mut transform: T) -> DatasetResult<usize>
    where
        P: FnMut(&[Value]) -> bool,
        T: FnMut(&Value) -> Value,
    {
        let idx = self
            .data
            .schema
            .index_of(column)
            .ok_or_else(|| DatasetError::unknown_column(column))?;
        if self.derivations.get(column).is_some() {
            return Err(DatasetError::Schema {
                message: format!("column '{column}' is derived; update its sources instead"),
            });
        }
        let field = self.data.schema.fields[idx].clone();

        let mut staged = Vec::new();
        for (i, row) in self.data.rows.iter().enumerate() {
            if predicate(row.as_slice()) {
                let value = coerce_cell(&field, transform(&row[idx]))?;
                staged.push((i, value));
            }
        }

        let updated = staged.len();
        for (i, value) in staged {
            self.data.rows[i][idx] = value;
        }

        if updated > 0 {
            let dependents = self.derivations.downstream_of(column, false);
            recompute(&dependents, &self.data.schema, &mut self.data.rows)?;
        }
        debug!(%column, updated, "field updated");
        Ok(updated)
    }

    /// Group rows by `key_column` and apply `op` to the other columns.
    ///
    /// See [`processing::group_by`] for the output shape.
    pub fn group_by(&self, key_column: &str, op: ReduceOp) -> DatasetResult<DataSet> {
        processing::group_by(&self.data, key_column, op)
    }

    /// Like [`Self::group_by`], with the aggregate given by name (`count`, `sum`, `mean`, `min`,
    /// `max`).
    ///
    /// # Errors
    ///
    /// [`DatasetError::UnsupportedAggregate`] for any other name.
    pub fn group_by_named(&self, key_column: &str, aggregate: &str) -> DatasetResult<DataSet> {
        self.group_by(key_column, aggregate.parse()?)
    }

    /// Min, max, mean, median and population standard deviation of a numeric column.
    ///
    /// # Errors
    ///
    /// [`DatasetError::EmptyDataset`] when there are no rows; see [`processing::statistics`].
    pub fn statistics(&self, column: &str) -> DatasetResult<ColumnStatistics> {
        processing::statistics(&self.data, column)
    }
}

fn conform_row(schema: &Schema, row: Vec<Value>) -> DatasetResult<Vec<Value>> {
    if row.len() != schema.len() {
        return Err(DatasetError::Schema {
            message: format!(
                "row has {} values but the schema has {} columns",
                row.len(),
                schema.len()
            ),
        });
    }
    schema
        .fields
        .iter()
        .zip(row)
        .map(|(field, value)| coerce_cell(field, value))
        .collect()
}

fn coerce_cell(field: &Field, value: Value) -> DatasetResult<Value> {
    let shown = value.to_string();
    let got = value.data_type();
    value.coerce_to(field.data_type).ok_or_else(|| DatasetError::Schema {
        message: format!(
            "column '{}' expects {:?}, got {:?} value '{}'",
            field.name, field.data_type, got, shown
        ),
    })
}
