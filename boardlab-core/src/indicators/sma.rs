//! Simple moving average over a window.

/// Arithmetic mean of `values`; 0 for an empty slice.
pub fn moving_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the last `period` values (all values if fewer are available).
pub fn trailing_mean(values: &[f64], period: usize) -> f64 {
    let start = values.len().saturating_sub(period);
    moving_average(&values[start..])
}
