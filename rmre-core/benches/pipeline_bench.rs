//! Criterion benchmarks for the series pipeline.
//!
//! Benchmarks:
//! 1. Normalization of raw rows (30 years of daily data)
//! 2. Range filter over the full history
//! 3. Resampling at every frequency
//! 4. Full pure pipeline (normalize → filter → log-return → resample)

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rmre_core::data::{normalize, RawRow, RawTable, SourceKind};
use rmre_core::domain::{Aggregation, Frequency, ValueKind};
use rmre_core::pipeline::{build_series, SeriesRequest};
use rmre_core::transform::{filter_range, log_returns, resample, DateBounds};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_raw_rows(years: i64) -> Vec<RawRow> {
    let start = NaiveDate::from_ymd_opt(1994, 1, 3).unwrap();
    (0..years * 365)
        .map(|i| start + Duration::days(i))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, date)| {
            let value = 3000.0 + (i as f64 * 0.01).sin() * 400.0;
            let ts = format!("{date}T00:00:00.000");
            let mut row = RawRow::new();
            row.insert("vigenciadesde".into(), ts.clone());
            row.insert("vigenciahasta".into(), ts);
            row.insert("valor".into(), format!("{value:.2}"));
            row
        })
        .collect()
}

fn make_table() -> RawTable {
    RawTable::new(SourceKind::OpenDataJson, make_raw_rows(30))
}

// ── 1. Normalize ─────────────────────────────────────────────────────

fn bench_normalize(c: &mut Criterion) {
    let table = make_table();
    c.bench_function("normalize_30y", |b| {
        b.iter(|| normalize(black_box(&table)).unwrap())
    });
}

// ── 2. Range filter ──────────────────────────────────────────────────

fn bench_filter(c: &mut Criterion) {
    let series = normalize(&make_table()).unwrap().series;
    let bounds = DateBounds::parse(Some("2005-01-03"), Some("2015-12-31")).unwrap();
    c.bench_function("filter_range_10y_window", |b| {
        b.iter(|| filter_range(black_box(&series), black_box(&bounds)).unwrap())
    });
}

// ── 3. Resample ──────────────────────────────────────────────────────

fn bench_resample(c: &mut Criterion) {
    let series = normalize(&make_table()).unwrap().series;
    let returns = log_returns(&series);
    let mut group = c.benchmark_group("resample");
    for freq in Frequency::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(freq), &freq, |b, &freq| {
            b.iter(|| resample(black_box(&returns), ValueKind::LogReturn, freq, Aggregation::Mean))
        });
    }
    group.finish();
}

// ── 4. Full pipeline ─────────────────────────────────────────────────

fn bench_build_series(c: &mut Criterion) {
    let table = make_table();
    let query = SeriesRequest::new()
        .log_return(true)
        .frequency(12)
        .aggregation("mean")
        .validate()
        .unwrap();
    c.bench_function("build_series_monthly_log_return", |b| {
        b.iter(|| build_series(black_box(&query), black_box(&table)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_filter,
    bench_resample,
    bench_build_series
);
criterion_main!(benches);
