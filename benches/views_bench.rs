//! Benchmarks for view derivation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use epiboard::data::{Metric, Record, Table, TableLoader};
use epiboard::views::{
    derive_bar_series, derive_choropleth_series, derive_summary, DashboardContext, Selection,
};

fn create_test_table(count: usize) -> Table {
    let records = (0..count)
        .map(|i| {
            let confirmed = (i * 1_000 + 17) as f64;
            Record::new(
                format!("Country {}", i),
                confirmed,
                confirmed * 0.02,
                confirmed * 0.7,
            )
        })
        .collect();
    Table::new(records).unwrap()
}

fn selection_of(size: usize, metric: Metric) -> Selection {
    Selection::new((0..size).map(|i| format!("Country {}", i * 3)), metric)
}

fn bench_derive(c: &mut Criterion) {
    let table = create_test_table(200);
    let mut group = c.benchmark_group("derive");

    for size in [3, 20, 60] {
        let selection = selection_of(size, Metric::Confirmed);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("bar_{}", size), |b| {
            b.iter(|| derive_bar_series(black_box(&table), &selection.countries, selection.metric))
        });

        group.bench_function(format!("summary_{}", size), |b| {
            b.iter(|| {
                derive_summary(black_box(&table), &selection.countries, selection.metric).unwrap()
            })
        });
    }

    group.bench_function("choropleth_200", |b| {
        b.iter(|| derive_choropleth_series(black_box(&table), Metric::Deaths))
    });

    group.finish();
}

fn bench_derive_all(c: &mut Criterion) {
    let ctx = DashboardContext::new(
        create_test_table(200),
        Selection::new(["Country 0", "Country 1", "Country 2"], Metric::Confirmed),
    );
    let wide = selection_of(60, Metric::Recovered);

    let mut group = c.benchmark_group("dashboard");

    group.bench_function("derive_all_defaults", |b| {
        b.iter(|| ctx.derive_all(black_box(ctx.defaults())))
    });

    group.bench_function("derive_all_60", |b| {
        b.iter(|| ctx.derive_all(black_box(&wide)))
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut csv_data = String::from("Country/Region,Confirmed,Deaths,Recovered\n");
    for i in 0..200 {
        csv_data.push_str(&format!("Country {},{},{},{}\n", i, i * 1_000, i * 20, i * 700));
    }

    c.bench_function("load_200_rows", |b| {
        b.iter(|| TableLoader::new().load_str(black_box(&csv_data)).unwrap())
    });
}

criterion_group!(benches, bench_derive, bench_derive_all, bench_load);
criterion_main!(benches);
