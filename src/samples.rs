//! Canned datasets and queries: a random integer array, a stock table and an employee table.
//!
//! These are the building blocks a presentation layer wires to its buttons. Each query is a thin
//! composition of [`TabularDataset`] operations and [`crate::processing::predicate`] builders.

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;

use crate::error::{DatasetError, DatasetResult};
use crate::input;
use crate::processing::{predicate, ReduceOp};
use crate::table::TabularDataset;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Default number of generated integers.
pub const RANDOM_COUNT: usize = 10;
/// Default inclusive lower bound for generated integers.
pub const RANDOM_LOW: i64 = -100;
/// Default exclusive upper bound for generated integers.
pub const RANDOM_HIGH: i64 = 500;

/// Exchange rate used for the derived `USD` column.
pub const USD_RATE: f64 = 23.0;

/// Remote employee list used by the employee view.
pub const EMPLOYEE_CSV_URL: &str = "https://tranduythanh.com/datasets/employee.csv";

/// A single-column (`value: Int64`) dataset of `count` integers drawn from `[low, high)`.
///
/// # Errors
///
/// [`DatasetError::Validation`] if `low >= high`.
pub fn random_integers<R>(rng: &mut R, count: usize, low: i64, high: i64) -> DatasetResult<TabularDataset>
where
    R: Rng + ?Sized,
{
    if low >= high {
        return Err(DatasetError::Validation {
            input: "range".to_string(),
            message: format!("lower bound {low} must be below upper bound {high}"),
        });
    }
    let rows = (0..count)
        .map(|_| vec![Value::Int64(rng.gen_range(low..high))])
        .collect();
    TabularDataset::new(
        Schema::new(vec![Field::new("value", DataType::Int64)]),
        rows,
    )
}

/// Columns of the stock table before `USD` is derived: `Symbol`, `Price`, `PE`, `Group`.
pub fn stock_schema() -> Schema {
    Schema::new(vec![
        Field::new("Symbol", DataType::Utf8),
        Field::new("Price", DataType::Float64),
        Field::new("PE", DataType::Float64),
        Field::new("Group", DataType::Utf8),
    ])
}

/// The eight built-in stocks, in [`stock_schema`] order.
pub fn stock_rows() -> Vec<Vec<Value>> {
    [
        ("AAPL", 180.5, 28.5, "Tech"),
        ("MSFT", 350.2, 32.1, "Tech"),
        ("GOOGL", 140.8, 25.7, "Tech"),
        ("AMZN", 130.5, 40.2, "Retail"),
        ("META", 300.7, 22.3, "Tech"),
        ("TSLA", 250.3, 60.5, "Auto"),
        ("NVDA", 450.2, 45.8, "Tech"),
        ("JPM", 140.6, 12.3, "Finance"),
    ]
    .into_iter()
    .map(|(symbol, price, pe, group)| {
        vec![
            Value::from(symbol),
            Value::Float64(price),
            Value::Float64(pe),
            Value::from(group),
        ]
    })
    .collect()
}

/// The stock table with `USD = Price / 23` derived.
pub fn stock_dataset() -> DatasetResult<TabularDataset> {
    let mut ds = TabularDataset::new(stock_schema(), stock_rows())?;
    ds.derive_column(Field::new("USD", DataType::Float64), &["Price"], |v| {
        v[0].as_f64().map(|p| p / USD_RATE).into()
    })?;
    Ok(ds)
}

/// Halve the price of `symbol`; returns the number of rows changed.
pub fn halve_price(ds: &mut TabularDataset, symbol: &str) -> DatasetResult<usize> {
    let is_symbol = predicate::equals(ds.schema(), "Symbol", symbol)?;
    ds.update_field(is_symbol, "Price", |v| v.as_f64().map(|p| p / 2.0).into())
}

/// Add a stock typed in by the user at position `index` (text, zero-based).
///
/// Every column except derived ones (`USD`) must be filled in; nothing is inserted otherwise.
///
/// # Errors
///
/// [`DatasetError::Validation`] for a missing field, a non-numeric price/PE or a malformed
/// index; [`DatasetError::Range`] for an index outside `0..=row_count()`.
pub fn add_stock(ds: &mut TabularDataset, index: &str, fields: &[(&str, &str)]) -> DatasetResult<()> {
    let computed: Vec<&str> = ds.derived_columns().iter().map(|c| c.name()).collect();
    let row = input::parse_complete_record(ds.schema(), fields, &computed)?;
    let index = input::parse_index(index)?;
    ds.insert_at(index, row)?;
    Ok(())
}

/// Delete every row for `symbol`; returns the number of rows removed.
pub fn delete_symbol(ds: &mut TabularDataset, symbol: &str) -> DatasetResult<usize> {
    let is_symbol = predicate::equals(ds.schema(), "Symbol", symbol)?;
    Ok(ds.delete_where(is_symbol))
}

/// Columns of the employee list. `BirthDate` is `YYYY-MM-DD` text.
pub fn employee_schema() -> Schema {
    Schema::new(vec![
        Field::new("ID", DataType::Utf8),
        Field::new("Name", DataType::Utf8),
        Field::new("BirthDate", DataType::Utf8),
        Field::new("Role", DataType::Utf8),
        Field::new("Department", DataType::Utf8),
        Field::new("Salary", DataType::Int64),
    ])
}

/// Employees appended to whatever the remote list provided.
pub fn employee_additions() -> Vec<Vec<Value>> {
    [
        ("E101", "Nguyen Van A", "2001-05-15", "Developer", "IT", 15_000_000),
        ("E102", "Tran Thi B", "1995-08-22", "Tester", "QA", 12_000_000),
        ("E103", "Le Van C", "1990-03-10", "Manager", "HR", 25_000_000),
        ("E104", "Pham Thi D", "2001-11-30", "Designer", "Marketing", 14_000_000),
        ("E105", "Hoang Van E", "1985-07-18", "Tester", "QA", 18_000_000),
    ]
    .into_iter()
    .map(|(id, name, birth, role, dept, salary)| {
        vec![
            Value::from(id),
            Value::from(name),
            Value::from(birth),
            Value::from(role),
            Value::from(dept),
            Value::Int64(salary),
        ]
    })
    .collect()
}

/// Append [`employee_additions`] to `base` and derive `Age = as_of_year - year(BirthDate)`.
///
/// `base` is usually the result of [`TabularDataset::load_or_empty`] with
/// [`employee_schema`]. Rows whose birth date does not parse get a `Null` age.
pub fn employee_dataset(mut base: TabularDataset, as_of_year: i32) -> DatasetResult<TabularDataset> {
    for row in employee_additions() {
        base.append(row)?;
    }
    base.derive_column(Field::new("Age", DataType::Int64), &["BirthDate"], move |v| {
        birth_year(&v[0]).map(|year| i64::from(as_of_year - year)).into()
    })?;
    Ok(base)
}

/// Year of a `YYYY-MM-DD` (or `YYYY/MM/DD`) date cell.
pub fn birth_year(value: &Value) -> Option<i32> {
    let text = value.as_str()?.trim();
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(|date| date.year())
}

/// The calendar year according to the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Employees matching both optional filters; `None` means "any".
pub fn filter_employees(
    ds: &TabularDataset,
    role: Option<&str>,
    year: Option<i32>,
) -> DatasetResult<DataSet> {
    let mut filters: Vec<predicate::RowPredicate> = Vec::new();
    if let Some(role) = role {
        filters.push(Box::new(predicate::equals(ds.schema(), "Role", role.to_string())?));
    }
    if let Some(year) = year {
        filters.push(Box::new(predicate::matching(ds.schema(), "BirthDate", move |v| {
            birth_year(v) == Some(year)
        })?));
    }
    Ok(ds.select(predicate::all(filters)))
}

/// Employees born in `year`.
pub fn born_in(ds: &TabularDataset, year: i32) -> DatasetResult<DataSet> {
    filter_employees(ds, None, Some(year))
}

/// Employees with `role`.
pub fn with_role(ds: &TabularDataset, role: &str) -> DatasetResult<DataSet> {
    filter_employees(ds, Some(role), None)
}

/// The `n` oldest employees, oldest first. Ties keep table order.
pub fn oldest(ds: &TabularDataset, n: usize) -> DatasetResult<DataSet> {
    Ok(ds.sorted("Age", false)?.head(n))
}

/// Distinct birth years, newest first, for a year filter.
pub fn birth_years(ds: &TabularDataset) -> DatasetResult<Vec<i32>> {
    let values = ds
        .snapshot()
        .column_values("BirthDate")
        .ok_or_else(|| DatasetError::unknown_column("BirthDate"))?;
    let mut years: Vec<i32> = values.filter_map(birth_year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    Ok(years)
}

/// Number of employees per role, most common first. Ties keep first-seen role order.
pub fn role_counts(ds: &TabularDataset) -> DatasetResult<Vec<(String, i64)>> {
    let grouped = ds.group_by("Role", ReduceOp::Count)?;
    let id = grouped
        .schema
        .index_of("ID")
        .ok_or_else(|| DatasetError::unknown_column("ID"))?;
    let mut counts: Vec<(String, i64)> = grouped
        .rows
        .iter()
        .filter_map(|row| Some((row[0].as_str()?.to_owned(), row[id].as_i64()?)))
        .collect();
    // Stable, so equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_integers_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let ds = random_integers(&mut rng, 200, RANDOM_LOW, RANDOM_HIGH).unwrap();
        assert_eq!(ds.row_count(), 200);
        assert!(ds
            .rows()
            .iter()
            .all(|r| matches!(r[0], Value::Int64(v) if (RANDOM_LOW..RANDOM_HIGH).contains(&v))));

        assert!(matches!(
            random_integers(&mut rng, 1, 5, 5),
            Err(DatasetError::Validation { .. })
        ));
    }

    #[test]
    fn stock_usd_follows_price() {
        let mut ds = stock_dataset().unwrap();
        assert_eq!(ds.schema().field_names().last(), Some("USD"));
        assert_eq!(halve_price(&mut ds, "AAPL").unwrap(), 1);
        assert_eq!(halve_price(&mut ds, "IBM").unwrap(), 0);
        assert_eq!(ds.rows()[0][1], Value::Float64(90.25));
        assert_eq!(delete_symbol(&mut ds, "JPM").unwrap(), 1);
        assert_eq!(ds.row_count(), 7);
    }

    #[test]
    fn birth_year_parses_dates() {
        assert_eq!(birth_year(&Value::from("2001-05-15")), Some(2001));
        assert_eq!(birth_year(&Value::from("1985/07/18")), Some(1985));
        assert_eq!(birth_year(&Value::from("July 1985")), None);
        assert_eq!(birth_year(&Value::Null), None);
    }

    #[test]
    fn employee_queries() {
        let ds = employee_dataset(TabularDataset::empty(employee_schema()), 2025).unwrap();
        assert_eq!(ds.row_count(), 5);
        let age = ds.schema().index_of("Age").unwrap();
        assert_eq!(ds.rows()[0][age], Value::Int64(24));

        assert_eq!(with_role(&ds, "Tester").unwrap().row_count(), 2);
        assert_eq!(born_in(&ds, 2001).unwrap().row_count(), 2);
        assert_eq!(birth_years(&ds).unwrap(), vec![2001, 1995, 1990, 1985]);

        let top = oldest(&ds, 3).unwrap();
        let ids: Vec<&str> = top.rows.iter().filter_map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["E105", "E103", "E102"]);

        assert_eq!(
            role_counts(&ds).unwrap(),
            vec![
                ("Tester".to_string(), 2),
                ("Developer".to_string(), 1),
                ("Manager".to_string(), 1),
                ("Designer".to_string(), 1),
            ]
        );
    }

    #[test]
    fn role_and_year_filters_intersect() {
        let ds = employee_dataset(TabularDataset::empty(employee_schema()), 2025).unwrap();
        let ids = |out: DataSet| -> Vec<String> {
            out.rows.iter().filter_map(|r| r[0].as_str().map(str::to_owned)).collect()
        };

        assert_eq!(ids(filter_employees(&ds, Some("Designer"), Some(2001)).unwrap()), vec!["E104"]);
        assert!(filter_employees(&ds, Some("Tester"), Some(2001)).unwrap().is_empty());
        assert_eq!(filter_employees(&ds, None, None).unwrap().row_count(), 5);
    }

    #[test]
    fn add_stock_requires_every_field() {
        let mut ds = stock_dataset().unwrap();
        let err = add_stock(&mut ds, "0", &[("Symbol", "IBM"), ("Price", "230"), ("Group", "Tech")])
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid PE: all fields are required");
        assert_eq!(ds.row_count(), 8);

        add_stock(
            &mut ds,
            "8",
            &[("Symbol", "IBM"), ("Price", "230"), ("PE", "21.5"), ("Group", "Tech")],
        )
        .unwrap();
        assert_eq!(ds.rows()[8][4], Value::Float64(10.0));
    }
}
