//! Derived (computed) columns.
//!
//! A [`DerivedColumn`] declares the source columns it reads and a formula over their values.
//! [`crate::table::TabularDataset`] keeps a [`Derivations`] registry and recomputes a derived
//! column whenever one of its sources changes, following chains of derived columns in
//! dependency order.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::{DatasetError, DatasetResult};
use crate::types::{Field, Schema, Value};

type Formula = Arc<dyn Fn(&[Value]) -> Value>;

/// A column whose values are computed from other columns of the same row.
#[derive(Clone)]
pub struct DerivedColumn {
    field: Field,
    sources: Vec<String>,
    formula: Formula,
}

impl DerivedColumn {
    /// Create a derived column.
    ///
    /// `formula` receives the values of `sources`, in the order given, for one row.
    pub fn new<F>(field: Field, sources: &[&str], formula: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Self {
            field,
            sources: sources.iter().map(|s| (*s).to_owned()).collect(),
            formula: Arc::new(formula),
        }
    }

    /// Name of the computed column.
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// The computed column's field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Source column names, in the order the formula receives them.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Evaluate the formula for `row`, coercing the result to the column type.
    ///
    /// A result that does not fit the column is stored as `Null`.
    fn compute(&self, source_idxs: &[usize], row: &[Value]) -> Value {
        let inputs: Vec<Value> = source_idxs
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        let out = (self.formula)(&inputs);
        let data_type = out.data_type();
        out.coerce_to(self.field.data_type).unwrap_or_else(|| {
            warn!(
                column = %self.field.name,
                expected = ?self.field.data_type,
                got = ?data_type,
                "derived value does not fit column type; storing null"
            );
            Value::Null
        })
    }
}

impl fmt::Debug for DerivedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedColumn")
            .field("field", &self.field)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

/// Registry of derived columns for one dataset.
///
/// The dependency graph is kept acyclic by [`Derivations::register`].
#[derive(Debug, Clone, Default)]
pub struct Derivations {
    columns: Vec<DerivedColumn>,
}

impl Derivations {
    /// Registered columns in registration order.
    pub fn columns(&self) -> &[DerivedColumn] {
        &self.columns
    }

    /// Look up a derived column by name.
    pub fn get(&self, name: &str) -> Option<&DerivedColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Add `column`, replacing any existing derivation with the same name.
    ///
    /// Fails with [`DatasetError::Schema`] if the column reads itself, directly or through other
    /// derived columns.
    pub fn register(&mut self, column: DerivedColumn) -> DatasetResult<()> {
        let name = column.name();
        if let Some(source) = column
            .sources
            .iter()
            .find(|s| s.as_str() == name || self.depends_on(s, name))
        {
            return Err(DatasetError::Schema {
                message: format!(
                    "derived column '{name}' cannot read '{source}': dependency cycle"
                ),
            });
        }

        match self.columns.iter_mut().find(|c| c.name() == column.name()) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// `true` if `column` is derived and reads `target`, directly or transitively.
    pub fn depends_on(&self, column: &str, target: &str) -> bool {
        match self.get(column) {
            Some(derived) => derived
                .sources
                .iter()
                .any(|s| s == target || self.depends_on(s, target)),
            None => false,
        }
    }

    /// Every derived column, in an order where sources come before their dependents.
    pub fn ordered(&self) -> Vec<&DerivedColumn> {
        topological(self.columns.iter().collect())
    }

    /// Derived columns that read `column` (transitively), in dependency order.
    ///
    /// With `include_self`, a derivation named `column` is included first in line.
    pub fn downstream_of(&self, column: &str, include_self: bool) -> Vec<&DerivedColumn> {
        topological(
            self.columns
                .iter()
                .filter(|c| (include_self && c.name() == column) || self.depends_on(c.name(), column))
                .collect(),
        )
    }
}

/// Order `pending` so that each column follows the derived columns it reads.
///
/// Ties keep registration order.
fn topological(mut pending: Vec<&DerivedColumn>) -> Vec<&DerivedColumn> {
    let mut out = Vec::with_capacity(pending.len());
    while let Some(pos) = pending.iter().position(|c| {
        c.sources
            .iter()
            .all(|s| pending.iter().all(|p| p.name() != s.as_str()))
    }) {
        out.push(pending.remove(pos));
    }
    // Only reachable if the graph has a cycle, which `register` rejects.
    out.extend(pending);
    out
}

/// Recompute `columns` for every row in `rows`.
///
/// Columns are applied one after another across all rows, so a column later in the list sees
/// fresh values of the columns before it.
pub(crate) fn recompute(
    columns: &[&DerivedColumn],
    schema: &Schema,
    rows: &mut [Vec<Value>],
) -> DatasetResult<()> {
    for column in columns {
        let target = schema
            .index_of(column.name())
            .ok_or_else(|| DatasetError::unknown_column(column.name()))?;
        let source_idxs = column
            .sources
            .iter()
            .map(|s| {
                schema
                    .index_of(s)
                    .ok_or_else(|| DatasetError::unknown_column(s))
            })
            .collect::<DatasetResult<Vec<_>>>()?;

        for row in rows.iter_mut() {
            let value = column.compute(&source_idxs, row);
            row[target] = value;
        }
    }
    Ok(())
}
