//! Simple moving average of close prices.
//!
//! Rolling mean over a trailing window. First defined value at index
//! window-1; earlier entries are NaN.

use crate::domain::PricePoint;

/// Equal-length SMA series over the closes of `points`.
pub fn sma(points: &[PricePoint], window: usize) -> Vec<f64> {
    assert!(window >= 1, "SMA window must be >= 1");

    let n = points.len();
    let mut result = vec![f64::NAN; n];

    if n < window {
        return result;
    }

    // Initial window sum
    let mut sum = 0.0;
    let mut nan_in_window = false;
    for p in points.iter().take(window) {
        if p.close.is_nan() {
            nan_in_window = true;
        }
        sum += p.close;
    }

    if !nan_in_window {
        result[window - 1] = sum / window as f64;
    }

    // Roll the window forward
    for i in window..n {
        let leaving = points[i - window].close;
        let entering = points[i].close;
        sum = sum - leaving + entering;

        // A NaN entering or leaving poisons the running sum; rescan the
        // window to recover once the NaN has rolled out.
        if entering.is_nan() || leaving.is_nan() || nan_in_window {
            nan_in_window = false;
            sum = 0.0;
            for p in &points[(i + 1 - window)..=i] {
                if p.close.is_nan() {
                    nan_in_window = true;
                }
                sum += p.close;
            }
            if nan_in_window {
                result[i] = f64::NAN;
                continue;
            }
        }

        result[i] = sum / window as f64;
    }

    result
}
