use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use envwatch::config::Settings;
use envwatch::data::{normalize, DailySummary, DashboardData, TimeWindows, WindowSpec};
use envwatch_types::{Metric, RawMeasurement};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
}

/// One row every two minutes going back from `now`, newest first, with a
/// missing temperature every 50th row.
fn snapshot(rows: usize) -> Vec<RawMeasurement> {
    (0..rows)
        .map(|i| {
            let at = now() - Duration::minutes(2 * i as i64);
            let row = RawMeasurement::new(at.to_rfc3339_opts(SecondsFormat::Micros, true))
                .with(Metric::Humidity, 35.0 + (i % 20) as f64)
                .with(Metric::Lightness, 50.0 + (i % 400) as f64);
            if i % 50 == 0 {
                row
            } else {
                row.with(Metric::Temperature, 18.0 + (i % 80) as f64 / 10.0)
            }
        })
        .collect()
}

/// Full pipeline at the store's default row limit and below
fn bench_from_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_snapshot");
    let settings = Settings::default();

    for rows in [500, 2000, 5000].iter() {
        let raw = snapshot(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &raw, |b, raw| {
            b.iter(|| DashboardData::from_snapshot(black_box(raw), now(), &settings).unwrap());
        });
    }
    group.finish();
}

/// Timestamp parsing dominates normalization
fn bench_normalize(c: &mut Criterion) {
    let raw = snapshot(5000);
    c.bench_function("normalize_5000", |b| {
        b.iter(|| normalize(black_box(&raw)).unwrap());
    });
}

fn bench_summary(c: &mut Criterion) {
    let measurements = normalize(&snapshot(5000)).unwrap();
    let windows = TimeWindows::at(now(), &WindowSpec::default());
    c.bench_function("daily_summary_5000", |b| {
        b.iter(|| DailySummary::compute(black_box(&measurements), &windows));
    });
}

criterion_group!(benches, bench_from_snapshot, bench_normalize, bench_summary);
criterion_main!(benches);
