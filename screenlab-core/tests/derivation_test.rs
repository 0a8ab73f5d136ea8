//! Integration tests for the derivation engine's contracts.

use chrono::NaiveDate;
use screenlab_core::derive::{align_backward, backward_asof, median_pe, pe_series, sma, ttm_eps};
use screenlab_core::domain::{EarningsPoint, PricePoint};

fn daily_points(closes: &[f64]) -> Vec<PricePoint> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            ts: (base + chrono::Duration::days(i as i64))
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

fn report(s: &str, eps: f64) -> EarningsPoint {
    EarningsPoint {
        report_date: NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap(),
        eps,
    }
}

#[test]
fn moving_average_defined_count_and_values() {
    // Property: for length L and window W <= L, exactly L-W+1 defined values,
    // each the mean of its trailing window.
    let closes: Vec<f64> = (0..260).map(|i| 50.0 + (i % 17) as f64).collect();
    let points = daily_points(&closes);

    for window in [1usize, 5, 50, 200, 260] {
        let series = sma(&points, window);
        assert_eq!(series.len(), closes.len());

        let defined = series.iter().filter(|v| !v.is_nan()).count();
        assert_eq!(defined, closes.len() - window + 1, "window {window}");

        for (i, v) in series.iter().enumerate() {
            if i + 1 < window {
                assert!(v.is_nan());
            } else {
                let expected: f64 =
                    closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                assert!((v - expected).abs() < 1e-9, "index {i}, window {window}");
            }
        }
    }
}

#[test]
fn one_year_daily_scenario_sma_counts() {
    // 252 trading days: SMA-50 has 203 defined points, SMA-200 has 53.
    let closes: Vec<f64> = (0..252).map(|i| 100.0 + i as f64 * 0.25).collect();
    let points = daily_points(&closes);

    assert_eq!(sma(&points, 50).iter().filter(|v| !v.is_nan()).count(), 203);
    assert_eq!(sma(&points, 200).iter().filter(|v| !v.is_nan()).count(), 53);
}

#[test]
fn ttm_eps_is_sum_of_four_most_recent() {
    let reports = vec![
        report("2022-03-31", 0.9),
        report("2022-06-30", 1.0),
        report("2022-09-30", 1.1),
        report("2022-12-31", 1.2),
        report("2023-03-31", 1.3),
    ];

    let ttm = ttm_eps(&reports);
    assert!(ttm[..3].iter().all(|v| v.is_nan()));
    assert!((ttm[3] - 4.2).abs() < 1e-12);
    assert!((ttm[4] - 4.6).abs() < 1e-12);
}

#[test]
fn pe_alignment_never_uses_future_reports() {
    let reports = vec![
        report("2023-03-31", 1.0),
        report("2023-06-30", 1.0),
        report("2023-09-30", 1.0),
        report("2023-12-31", 1.0),
        report("2024-03-31", 2.0),
    ];
    let ttm = ttm_eps(&reports);

    // 90 daily prices starting 2023-01-02: the first reports land mid-series
    let closes: Vec<f64> = (0..90).map(|_| 40.0).collect();
    let points = daily_points(&closes);

    let aligned = align_backward(&points, &reports, &ttm);
    let pe = pe_series(&points, &aligned);

    for (p, v) in points.iter().zip(&pe) {
        if p.ts.date() < reports[3].report_date {
            // TTM undefined until four reports exist; no forward peeking
            assert!(v.is_nan(), "PE defined before the fourth report");
        }
    }

    // A price date before the first report has no PE at all
    let early = backward_asof(
        &[NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()],
        &reports.iter().map(|r| r.report_date).collect::<Vec<_>>(),
    );
    assert_eq!(early[0], None);
}

#[test]
fn median_pe_matches_statistical_median_and_skips_gaps() {
    let pe = [f64::NAN, 18.0, 22.0, f64::NAN, 20.0, 24.0, 16.0];
    // defined sorted: 16 18 20 22 24 → median 20
    assert!((median_pe(&pe).unwrap() - 20.0).abs() < 1e-12);

    // appending undefined entries changes nothing
    let mut padded = pe.to_vec();
    padded.extend([f64::NAN; 40]);
    assert_eq!(median_pe(&padded), median_pe(&pe));
}

#[test]
fn zero_ttm_surfaces_as_gap_not_error() {
    let reports = vec![
        report("2023-03-31", 1.0),
        report("2023-06-30", -1.0),
        report("2023-09-30", 1.0),
        report("2023-12-31", -1.0),
    ];
    let ttm = ttm_eps(&reports);
    assert_eq!(ttm[3], 0.0);

    // prices dated after the fourth report: aligned TTM is exactly 0.0
    let mut points = daily_points(&[100.0; 5]);
    for p in &mut points {
        p.ts += chrono::Duration::days(365);
    }
    let aligned = align_backward(&points, &reports, &ttm);
    assert!(aligned.iter().all(|v| *v == 0.0));

    let pe = pe_series(&points, &aligned);
    assert!(pe.iter().all(|v| v.is_nan()));
}
