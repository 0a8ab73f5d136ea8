//! Criterion benchmarks for the derivation engine.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use screenlab_core::derive::{align_backward, pe_series, sma, ttm_eps};
use screenlab_core::domain::{EarningsPoint, PricePoint};

fn daily_points(n: usize) -> Vec<PricePoint> {
    let base = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i % 37) as f64 * 0.5;
            PricePoint {
                ts: (base + chrono::Duration::days(i as i64))
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000,
            }
        })
        .collect()
}

fn quarterly_reports(n: usize) -> Vec<EarningsPoint> {
    let base = NaiveDate::from_ymd_opt(2000, 3, 31).unwrap();
    (0..n)
        .map(|i| EarningsPoint {
            report_date: base + chrono::Months::new(3 * i as u32),
            eps: 1.0 + (i % 5) as f64 * 0.1,
        })
        .collect()
}

fn bench_sma(c: &mut Criterion) {
    let points = daily_points(10_000);
    c.bench_function("sma_50_10k", |b| {
        b.iter(|| sma(black_box(&points), black_box(50)))
    });
    c.bench_function("sma_200_10k", |b| {
        b.iter(|| sma(black_box(&points), black_box(200)))
    });
}

fn bench_pe_chain(c: &mut Criterion) {
    let points = daily_points(10_000);
    let reports = quarterly_reports(100);

    c.bench_function("pe_chain_10k", |b| {
        b.iter(|| {
            let ttm = ttm_eps(black_box(&reports));
            let aligned = align_backward(&points, &reports, &ttm);
            pe_series(&points, &aligned)
        })
    });
}

criterion_group!(benches, bench_sma, bench_pe_chain);
criterion_main!(benches);
