//! Rate of change.
//!
//! ROC = (last - first) / first, as a fraction (0.10 = +10%).
//! Defined as 0 with fewer than two values or a zero base.

/// Fractional change from the first to the last value of the slice.
pub fn rate_of_change(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let start = values[0];
    let end = values[values.len() - 1];
    if start == 0.0 {
        return 0.0;
    }
    (end - start) / start
}

/// Rate of change over the last `window` values.
///
/// With fewer than `window` values the whole slice is used.
pub fn window_return(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    rate_of_change(&values[start..])
}
