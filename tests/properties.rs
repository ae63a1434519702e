use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rust_tabular::processing::{self, predicate};
use rust_tabular::samples::random_integers;
use rust_tabular::types::{DataType, Field, Schema, Value};
use rust_tabular::{DatasetError, TabularDataset};

fn small_stocks() -> TabularDataset {
    let schema = Schema::new(vec![
        Field::new("Symbol", DataType::Utf8),
        Field::new("Price", DataType::Float64),
        Field::new("Group", DataType::Utf8),
    ]);
    TabularDataset::new(
        schema,
        vec![
            vec![Value::from("AAPL"), Value::Float64(180.5), Value::from("Tech")],
            vec![Value::from("AMZN"), Value::Float64(130.5), Value::from("Retail")],
            vec![Value::from("MSFT"), Value::Float64(350.2), Value::from("Tech")],
        ],
    )
    .unwrap()
}

#[test]
fn select_and_its_complement_partition_the_rows() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..20 {
        let ds = random_integers(&mut rng, 50, -100, 500).unwrap();
        let low = rng.gen_range(-100.0..250.0);
        let high = low + rng.gen_range(0.0..250.0);
        let hit = predicate::between(ds.schema(), "value", low, high).unwrap();
        let miss = predicate::not(predicate::between(ds.schema(), "value", low, high).unwrap());
        assert_eq!(ds.select(hit).row_count() + ds.select(miss).row_count(), ds.row_count());
    }
}

#[test]
fn mean_lies_between_min_and_max() {
    let mut rng = StdRng::seed_from_u64(9);
    for count in 1..30 {
        let ds = random_integers(&mut rng, count, -100, 500).unwrap();
        let s = ds.statistics("value").unwrap();
        assert!(s.min <= s.mean && s.mean <= s.max);
        assert!(s.min <= s.median && s.median <= s.max);
    }
}

#[test]
fn sort_is_monotonic_and_stable() {
    let schema = Schema::new(vec![
        Field::new("key", DataType::Int64),
        Field::new("seq", DataType::Int64),
    ]);
    let mut rng = StdRng::seed_from_u64(10);
    let rows: Vec<Vec<Value>> = (0..100)
        .map(|i| vec![Value::Int64(rng.gen_range(0..5)), Value::Int64(i)])
        .collect();
    let ds = TabularDataset::new(schema, rows).unwrap();

    for ascending in [true, false] {
        let sorted = ds.sorted("key", ascending).unwrap();
        for pair in sorted.rows.windows(2) {
            let (a, b) = (pair[0][0].as_i64().unwrap(), pair[1][0].as_i64().unwrap());
            if ascending {
                assert!(a <= b);
            } else {
                assert!(a >= b);
            }
            if a == b {
                assert!(pair[0][1].as_i64() < pair[1][1].as_i64());
            }
        }
    }
}

#[test]
fn sorting_is_repeatable_and_idempotent() {
    let schema = Schema::new(vec![
        Field::new("price", DataType::Float64),
        Field::new("seq", DataType::Int64),
    ]);
    let mut rng = StdRng::seed_from_u64(11);
    let rows: Vec<Vec<Value>> = (0..60)
        .map(|i| {
            let price = match rng.gen_range(0..6) {
                0 => Value::Null,
                k => Value::Float64(f64::from(k) * 12.5),
            };
            vec![price, Value::Int64(i)]
        })
        .collect();
    let ds = TabularDataset::new(schema, rows).unwrap();

    for ascending in [true, false] {
        let once = ds.sorted("price", ascending).unwrap();
        assert_eq!(ds.sorted("price", ascending).unwrap(), once);
        assert_eq!(processing::sort(&once, "price", ascending).unwrap(), once);
    }
}

#[test]
fn nulls_sort_last_in_both_directions() {
    let schema = Schema::new(vec![Field::new("x", DataType::Float64)]);
    let rows = vec![
        vec![Value::Float64(2.0)],
        vec![Value::Null],
        vec![Value::Int64(3)],
        vec![Value::Float64(-1.0)],
    ];
    let ds = TabularDataset::new(schema, rows).unwrap();
    let asc = ds.sorted("x", true).unwrap();
    assert_eq!(asc.rows.last().unwrap()[0], Value::Null);
    assert_eq!(asc.rows[0][0], Value::Float64(-1.0));
    let desc = ds.sorted("x", false).unwrap();
    assert_eq!(desc.rows.last().unwrap()[0], Value::Null);
    assert_eq!(desc.rows[0][0], Value::Float64(3.0));
}

#[test]
fn insert_bounds() {
    let mut ds = small_stocks();
    let row = || vec![Value::from("JPM"), Value::Float64(140.6), Value::from("Finance")];
    assert!(matches!(ds.insert_at(-1, row()), Err(DatasetError::Range { .. })));
    assert!(matches!(ds.insert_at(4, row()), Err(DatasetError::Range { .. })));
    assert_eq!(ds.row_count(), 3);
    ds.insert_at(3, row()).unwrap();
    assert_eq!(ds.rows()[3][0], Value::from("JPM"));
}

#[test]
fn delete_then_reinsert_restores_count() {
    let mut ds = small_stocks();
    let before = ds.row_count();
    let amzn = predicate::equals(ds.schema(), "Symbol", "AMZN").unwrap();
    let removed = ds.select(&amzn);
    assert_eq!(ds.delete_where(&amzn), 1);
    for row in removed.rows {
        ds.append(row).unwrap();
    }
    assert_eq!(ds.row_count(), before);
}

#[test]
fn chained_derived_columns_stay_consistent() {
    let mut ds = small_stocks();
    ds.derive_column(Field::new("USD", DataType::Float64), &["Price"], |v| {
        v[0].as_f64().map(|p| p / 23.0).into()
    })
    .unwrap();
    ds.derive_column(Field::new("USD_CENTS", DataType::Int64), &["USD"], |v| {
        v[0].as_f64().map(|u| (u * 100.0).round() as i64).into()
    })
    .unwrap();

    let check = |ds: &TabularDataset| {
        for row in ds.rows() {
            let usd = row[1].as_f64().map(|p| p / 23.0);
            assert_eq!(row[3].as_f64(), usd);
            assert_eq!(row[4].as_i64(), usd.map(|u| (u * 100.0).round() as i64));
        }
    };
    check(&ds);

    ds.update_field(|_| true, "Price", |v| v.as_f64().map(|p| p * 3.0).into())
        .unwrap();
    check(&ds);

    ds.insert_at(1, vec![Value::from("IBM"), Value::Int64(46), Value::from("Tech"), Value::Null, Value::Null])
        .unwrap();
    check(&ds);
    assert_eq!(ds.rows()[1][4], Value::Int64(200));

    assert!(matches!(
        ds.derive_column(Field::new("Price", DataType::Float64), &["USD_CENTS"], |v| v[0].clone()),
        Err(DatasetError::Schema { .. })
    ));
}

#[test]
fn group_count_in_first_seen_order() {
    let ds = small_stocks();
    let grouped = ds.group_by_named("Group", "count").unwrap();
    assert_eq!(
        grouped.rows,
        vec![
            vec![Value::from("Tech"), Value::Int64(2), Value::Int64(2)],
            vec![Value::from("Retail"), Value::Int64(1), Value::Int64(1)],
        ]
    );
}
