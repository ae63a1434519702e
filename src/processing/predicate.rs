//! Reusable row predicates.
//!
//! Each builder resolves its column against a [`Schema`] once, failing with
//! [`DatasetError::Schema`] if the column is unknown, and returns a closure over `&[Value]` rows
//! that can be handed to [`crate::processing::filter()`] or any of the
//! [`crate::table::TabularDataset`] operations taking a predicate.
//!
//! `Null` cells never satisfy a comparison, so `negative` and `non_negative` together do not
//! cover a column containing nulls. Use [`not`] when an exact complement is required.

use crate::error::{DatasetError, DatasetResult};
use crate::types::{Schema, Value};

fn resolve(schema: &Schema, column: &str) -> DatasetResult<usize> {
    schema
        .index_of(column)
        .ok_or_else(|| DatasetError::unknown_column(column))
}

/// Rows whose `column` equals `value`. Integers and floats compare numerically.
pub fn equals<V>(
    schema: &Schema,
    column: &str,
    value: V,
) -> DatasetResult<impl Fn(&[Value]) -> bool + use<V>>
where
    V: Into<Value>,
{
    let idx = resolve(schema, column)?;
    let expected = value.into();
    Ok(move |row: &[Value]| row.get(idx).is_some_and(|v| cells_equal(v, &expected)))
}

/// Rows whose numeric `column` lies in `[low, high]` (inclusive on both ends).
pub fn between(
    schema: &Schema,
    column: &str,
    low: f64,
    high: f64,
) -> DatasetResult<impl Fn(&[Value]) -> bool + use<>> {
    matching(schema, column, move |v| {
        v.as_f64().is_some_and(|x| x >= low && x <= high)
    })
}

/// Rows whose numeric `column` is strictly below zero.
pub fn negative(schema: &Schema, column: &str) -> DatasetResult<impl Fn(&[Value]) -> bool + use<>> {
    matching(schema, column, |v| v.as_f64().is_some_and(|x| x < 0.0))
}

/// Rows whose numeric `column` is zero or above.
pub fn non_negative(
    schema: &Schema,
    column: &str,
) -> DatasetResult<impl Fn(&[Value]) -> bool + use<>> {
    matching(schema, column, |v| v.as_f64().is_some_and(|x| x >= 0.0))
}

/// Rows whose integer `column` holds a perfect square.
pub fn perfect_square(
    schema: &Schema,
    column: &str,
) -> DatasetResult<impl Fn(&[Value]) -> bool + use<>> {
    matching(schema, column, |v| v.as_i64().is_some_and(is_perfect_square))
}

/// Rows for which `test` accepts the cell in `column`.
pub fn matching<T>(
    schema: &Schema,
    column: &str,
    test: T,
) -> DatasetResult<impl Fn(&[Value]) -> bool + use<T>>
where
    T: Fn(&Value) -> bool,
{
    let idx = resolve(schema, column)?;
    Ok(move |row: &[Value]| row.get(idx).is_some_and(&test))
}

/// Logical complement of `predicate`.
pub fn not<P>(predicate: P) -> impl Fn(&[Value]) -> bool
where
    P: Fn(&[Value]) -> bool,
{
    move |row: &[Value]| !predicate(row)
}

/// Rows accepted by both `left` and `right`. `right` is not evaluated when `left` rejects.
pub fn and<L, R>(left: L, right: R) -> impl Fn(&[Value]) -> bool
where
    L: Fn(&[Value]) -> bool,
    R: Fn(&[Value]) -> bool,
{
    move |row: &[Value]| left(row) && right(row)
}

/// A boxed row predicate, for building filter lists whose length is only known at runtime.
pub type RowPredicate = Box<dyn Fn(&[Value]) -> bool>;

/// Rows accepted by every predicate in `predicates`. An empty list accepts every row.
pub fn all(predicates: Vec<RowPredicate>) -> impl Fn(&[Value]) -> bool {
    move |row: &[Value]| predicates.iter().all(|p| p(row))
}

/// `true` if `n` is the square of an integer. Negative numbers never are.
pub fn is_perfect_square(n: i64) -> bool {
    if n < 0 {
        return false;
    }
    let r = n.isqrt();
    r * r == n
}

fn cells_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
