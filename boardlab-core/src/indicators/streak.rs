//! Positive streak detection.

/// Length of the longest contiguous run of strictly positive values.
pub fn longest_positive_run(values: &[f64]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &value in values {
        if value > 0.0 {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Longest positive run divided by the series length; 0 for an empty series.
pub fn positive_run_ratio(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    longest_positive_run(values) as f64 / values.len() as f64
}
