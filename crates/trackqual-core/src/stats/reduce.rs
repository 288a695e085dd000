//! NaN-aware reductions over per-frame time series.
//!
//! Undefined entries are dropped, never treated as zero. An all-undefined
//! (or empty) series reduces to NaN.

/// Arithmetic mean of the defined entries.
pub fn nan_mean(series: &[f64]) -> f64 {
    let (sum, count) = series
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0f64, 0usize), |(s, n), &v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population standard deviation (divisor n) of the defined entries.
pub fn nan_std(series: &[f64]) -> f64 {
    let mean = nan_mean(series);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (sum_sq, count) = series
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0f64, 0usize), |(s, n), &v| (s + (v - mean) * (v - mean), n + 1));
    (sum_sq / count as f64).sqrt()
}
