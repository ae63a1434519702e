use rust_tabular::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_from_str};
use rust_tabular::samples::{employee_schema, stock_schema};
use rust_tabular::types::Value;

#[test]
fn ingest_stock_fixture_with_null_cell() {
    let ds = ingest_csv_from_path("tests/fixtures/stocks.csv", &stock_schema()).unwrap();

    assert_eq!(ds.row_count(), 4);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Utf8("AAPL".to_string()),
            Value::Float64(180.5),
            Value::Float64(28.5),
            Value::Utf8("Tech".to_string()),
        ]
    );
    assert_eq!(ds.rows[3][2], Value::Null);
}

#[test]
fn extra_columns_are_ignored() {
    let ds = ingest_csv_from_path("tests/fixtures/employees.csv", &employee_schema()).unwrap();
    assert_eq!(ds.schema, employee_schema());
    assert_eq!(ds.rows[1][0], Value::from("E002"));
    assert_eq!(ds.rows[1][5], Value::Int64(16_000_000));
}

#[test]
fn reordered_and_padded_headers_are_matched() {
    let input = " Group ,PE,Price,Symbol\nRetail,40.2,130.5,AMZN\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr, &stock_schema()).unwrap();
    assert_eq!(ds.rows[0][0], Value::from("AMZN"));
    assert_eq!(ds.rows[0][3], Value::from("Retail"));
}

#[test]
fn missing_required_column_is_a_schema_mismatch() {
    let err = ingest_csv_from_str("Symbol,Price\nAAPL,1\n", &stock_schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column(s) 'PE', 'Group'"));
}

#[test]
fn parse_error_reports_row_and_column() {
    let err = ingest_csv_from_path("tests/fixtures/bad_price.csv", &stock_schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 2"));
    assert!(msg.contains("column 'Price'"));
    assert!(msg.contains("raw='cheap'"));
}
