//! Backward as-of alignment and PE derivation.
//!
//! Joining a sparse quarterly series onto a dense price axis takes the most
//! recent report at or before each price date — never a future one, never
//! interpolated. That direction is a correctness invariant: a PE computed
//! from a not-yet-published report would be forward-looking.

use chrono::NaiveDate;

use crate::domain::{EarningsPoint, PricePoint};

/// For each target date, the index of the latest report date <= target.
///
/// Both slices must be sorted ascending. O(n + m) two-pointer walk.
pub fn backward_asof(targets: &[NaiveDate], reports: &[NaiveDate]) -> Vec<Option<usize>> {
    let mut out = Vec::with_capacity(targets.len());
    let mut r = 0usize;

    for &target in targets {
        while r < reports.len() && reports[r] <= target {
            r += 1;
        }
        // r is now the count of reports at or before target
        out.push(r.checked_sub(1));
    }

    out
}

/// Align per-report values onto the price axis with a backward as-of join.
///
/// NaN where no report precedes the price date. `values` is per-report
/// (e.g. the TTM series) and must be the same length as `reports`.
pub fn align_backward(prices: &[PricePoint], reports: &[EarningsPoint], values: &[f64]) -> Vec<f64> {
    assert_eq!(
        reports.len(),
        values.len(),
        "per-report values must align with reports"
    );

    let price_dates: Vec<NaiveDate> = prices.iter().map(|p| p.ts.date()).collect();
    let report_dates: Vec<NaiveDate> = reports.iter().map(|e| e.report_date).collect();

    backward_asof(&price_dates, &report_dates)
        .into_iter()
        .map(|idx| idx.map_or(f64::NAN, |i| values[i]))
        .collect()
}

/// PE per price point: close / aligned TTM EPS.
///
/// NaN when the aligned TTM is undefined or zero — division by zero surfaces
/// as a gap, not an error.
pub fn pe_series(prices: &[PricePoint], ttm_aligned: &[f64]) -> Vec<f64> {
    assert_eq!(prices.len(), ttm_aligned.len());

    prices
        .iter()
        .zip(ttm_aligned)
        .map(|(p, &ttm)| {
            if ttm.is_nan() || ttm == 0.0 {
                f64::NAN
            } else {
                p.close / ttm
            }
        })
        .collect()
}

/// Median of the defined values; None when every entry is NaN.
///
/// Even-length medians average the two middle values.
pub fn median_pe(values: &[f64]) -> Option<f64> {
    let mut defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if defined.is_empty() {
        return None;
    }

    defined.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = defined.len() / 2;
    if defined.len() % 2 == 1 {
        Some(defined[mid])
    } else {
        Some((defined[mid - 1] + defined[mid]) / 2.0)
    }
}
