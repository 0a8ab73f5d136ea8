//! Trailing-twelve-month EPS — rolling 4-quarter sum.

use crate::domain::EarningsPoint;

/// Quarters in a trailing-twelve-month window.
const TTM_QUARTERS: usize = 4;

/// Equal-length TTM series over quarterly EPS reports.
///
/// Index i is the sum of eps[i-3..=i]; NaN while fewer than four reports
/// exist.
pub fn ttm_eps(reports: &[EarningsPoint]) -> Vec<f64> {
    let n = reports.len();
    let mut result = vec![f64::NAN; n];

    if n < TTM_QUARTERS {
        return result;
    }

    let mut sum: f64 = reports.iter().take(TTM_QUARTERS).map(|e| e.eps).sum();
    result[TTM_QUARTERS - 1] = sum;

    for i in TTM_QUARTERS..n {
        sum = sum - reports[i - TTM_QUARTERS].eps + reports[i].eps;
        result[i] = sum;
    }

    result
}
