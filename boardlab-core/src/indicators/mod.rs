//! Numeric primitives shared by every factor computer.
//!
//! All helpers reduce a plain `&[f64]` window to a scalar. Degenerate inputs
//! (empty windows, fewer than two values, zero base) are defined as 0 rather
//! than NaN so that downstream scores stay finite.

pub mod roc;
pub mod sma;
pub mod streak;

pub use roc::{rate_of_change, window_return};
pub use sma::{moving_average, trailing_mean};
pub use streak::{longest_positive_run, positive_run_ratio};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator and factor tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
