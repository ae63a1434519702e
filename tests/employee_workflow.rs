use rust_tabular::ingestion::{DataSource, LoadOptions};
use rust_tabular::samples::{
    birth_years, born_in, employee_dataset, employee_schema, filter_employees, oldest, role_counts,
    with_role,
};
use rust_tabular::types::Value;
use rust_tabular::TabularDataset;

fn loaded(path: &str) -> TabularDataset {
    let base = TabularDataset::load_or_empty(
        &DataSource::path(path),
        &employee_schema(),
        &LoadOptions::default(),
    );
    employee_dataset(base, 2025).unwrap()
}

fn ids(ds: &rust_tabular::types::DataSet) -> Vec<&str> {
    ds.rows.iter().filter_map(|r| r[0].as_str()).collect()
}

#[test]
fn additions_follow_loaded_rows() {
    let ds = loaded("tests/fixtures/employees.csv");
    assert_eq!(ds.row_count(), 8);
    assert_eq!(ds.rows()[0][0], Value::from("E001"));
    assert_eq!(ds.rows()[3][0], Value::from("E101"));

    let age = ds.schema().index_of("Age").unwrap();
    assert_eq!(age, 6);
    assert_eq!(ds.rows()[0][age], Value::Int64(37));
}

#[test]
fn failed_load_still_yields_the_additions() {
    let ds = loaded("tests/fixtures/missing.csv");
    assert_eq!(ds.row_count(), 5);
    assert_eq!(ds.rows()[4][0], Value::from("E105"));
}

#[test]
fn role_and_year_filters_compose() {
    let ds = loaded("tests/fixtures/employees.csv");

    let testers = with_role(&ds, "Tester").unwrap();
    assert_eq!(ids(&testers), vec!["E003", "E102", "E105"]);

    let born_2001 = born_in(&ds, 2001).unwrap();
    assert_eq!(ids(&born_2001), vec!["E003", "E101", "E104"]);

    let both = filter_employees(&ds, Some("Tester"), Some(2001)).unwrap();
    assert_eq!(ids(&both), vec!["E003"]);
    let both = filter_employees(&ds, Some("Developer"), Some(1995)).unwrap();
    assert_eq!(ids(&both), vec!["E002"]);
    assert!(filter_employees(&ds, Some("Manager"), Some(2001)).unwrap().is_empty());

    assert!(with_role(&ds, "Intern").unwrap().is_empty());
    assert_eq!(birth_years(&ds).unwrap(), vec![2001, 1995, 1990, 1988, 1985]);
}

#[test]
fn top_three_oldest() {
    let ds = loaded("tests/fixtures/employees.csv");
    assert_eq!(ids(&oldest(&ds, 3).unwrap()), vec!["E105", "E001", "E103"]);
    assert_eq!(oldest(&ds, 50).unwrap().row_count(), 8);
}

#[test]
fn counts_per_role() {
    let ds = loaded("tests/fixtures/employees.json");
    assert_eq!(
        role_counts(&ds).unwrap(),
        vec![
            ("Tester".to_string(), 3),
            ("Manager".to_string(), 2),
            ("Developer".to_string(), 2),
            ("Designer".to_string(), 1),
        ]
    );
}

#[test]
fn distinct_values_feed_filters() {
    let ds = loaded("tests/fixtures/employees.csv");
    let roles = ds.snapshot().distinct("Role").unwrap();
    assert_eq!(
        roles,
        vec![
            Value::from("Manager"),
            Value::from("Developer"),
            Value::from("Tester"),
            Value::from("Designer"),
        ]
    );
}
