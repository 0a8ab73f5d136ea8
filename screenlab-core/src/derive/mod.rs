//! Series derivation — rolling means, trailing sums, as-of alignment.
//!
//! Derived series are aligned to their input axis and equal in length.
//! Undefined entries are NaN: not enough trailing history is a data gap,
//! never an error.

pub mod asof;
pub mod sma;
pub mod ttm;

pub use asof::{align_backward, backward_asof, median_pe, pe_series};
pub use sma::sma;
pub use ttm::ttm_eps;

/// Create synthetic price points from close prices for testing.
///
/// One point per calendar day starting 2024-01-02, with plausible OHLV
/// around the close.
#[cfg(test)]
pub fn make_points(closes: &[f64]) -> Vec<crate::domain::PricePoint> {
    use crate::domain::PricePoint;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PricePoint {
                ts: (base + chrono::Duration::days(i as i64))
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for derivation tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
