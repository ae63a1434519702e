use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_tabular::processing::{predicate, ReduceOp};
use rust_tabular::samples::random_integers;
use rust_tabular::types::{DataType, Field, Value};
use rust_tabular::TabularDataset;

const ROWS: usize = 50_000;

fn integers() -> TabularDataset {
    let mut rng = StdRng::seed_from_u64(42);
    random_integers(&mut rng, ROWS, -100, 500).unwrap()
}

fn with_bucket(mut ds: TabularDataset) -> TabularDataset {
    ds.derive_column(Field::new("bucket", DataType::Int64), &["value"], |v| {
        v[0].as_i64().map(|x| x.rem_euclid(16)).into()
    })
    .unwrap();
    ds
}

fn bench_sort(c: &mut Criterion) {
    let ds = integers();
    c.bench_function("sorted_50k", |b| {
        b.iter(|| black_box(ds.sorted("value", true).unwrap()))
    });
}

fn bench_group_by(c: &mut Criterion) {
    let ds = with_bucket(integers());
    c.bench_function("group_by_mean_50k", |b| {
        b.iter(|| black_box(ds.group_by("bucket", ReduceOp::Mean).unwrap()))
    });
}

fn bench_update_field(c: &mut Criterion) {
    let ds = with_bucket(integers());
    c.bench_function("update_field_with_derived_50k", |b| {
        b.iter_batched(
            || ds.clone(),
            |mut ds| {
                let neg = predicate::negative(ds.schema(), "value").unwrap();
                let n = ds
                    .update_field(neg, "value", |v| v.as_i64().map(|x| -x).map(Value::Int64).unwrap_or(Value::Null))
                    .unwrap();
                black_box(n)
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_sort, bench_group_by, bench_update_field);
criterion_main!(benches);
