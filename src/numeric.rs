//! Floating point comparison helpers, thin wrappers around the approx crate.

use approx::AbsDiffEq;

/// Tolerance used when checking that a probability vector sums to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// Compares if two floats are close via `approx::abs_diff_eq` using a maximum absolute difference
/// (epsilon) of `acc`.
#[must_use]
pub fn almost_eq(a: f64, b: f64, acc: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a == b;
    }
    a.abs_diff_eq(&b, acc)
}

/// Returns true if every entry is a probability and the entries sum to one.
#[must_use]
pub fn is_probability_vector(probabilities: &[f64]) -> bool {
    probabilities.iter().all(|p| (0.0..=1.0).contains(p))
        && almost_eq(
            probabilities.iter().sum(),
            1.0,
            PROBABILITY_SUM_TOLERANCE,
        )
}
