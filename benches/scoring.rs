//! Benchmarks for SNR scoring and the multi-series merge.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use chrono::{Days, NaiveDate};
use market_divergence::{build_series, merge_series, score_series, RawRecord, Series, DATE_FORMAT};

/// Build a synthetic daily series with a deterministic wobble in the closes.
fn synthetic_series(name: &str, days: usize, base: f64) -> Series {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let records: Vec<RawRecord> = (0..days)
        .map(|i| {
            let date = start + Days::new(i as u64);
            let close = base + (i % 17) as f64 * 0.25 + (i / 17) as f64;
            RawRecord::new(
                date.format(DATE_FORMAT).to_string(),
                (close - 0.5).to_string(),
                (close + 1.0).to_string(),
                (close - 1.0).to_string(),
                close.to_string(),
                "1000",
                "500",
            )
        })
        .collect();
    let (series, rejected) = build_series(name, records);
    assert!(rejected.is_empty());
    series
}

fn bench_scoring(c: &mut Criterion) {
    let series = synthetic_series("bench", 10_000, 100.0);

    let mut group = c.benchmark_group("scoring");
    group.throughput(Throughput::Elements(series.len() as u64));

    group.bench_function("score_10k_p97", |b| {
        b.iter(|| {
            let mut s = series.clone();
            score_series(&mut s, black_box(97));
            s
        })
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut inputs = Vec::new();
    for (i, name) in ["alpha", "beta", "gamma", "delta"].iter().enumerate() {
        let mut s = synthetic_series(name, 5_000 + i * 250, 50.0 * (i + 1) as f64);
        score_series(&mut s, 97);
        inputs.push(s);
    }

    let total: u64 = inputs.iter().map(|s| s.len() as u64).sum();

    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(total));

    group.bench_function("merge_4_series", |b| {
        b.iter(|| merge_series(black_box(inputs.clone())))
    });

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_merge);
criterion_main!(benches);
