//! # Domain Invariants
//!
//! Constants and rules that must hold across every loaded comparison.

/// Default p-value threshold: include everything.
pub const DEFAULT_P_VALUE_THRESHOLD: f64 = 1.0;

/// `min_p_value` of a comparison where no row qualifies.
pub const DEFAULT_MIN_P_VALUE: f64 = 1.0;

/// Comparison resource location template used when the manifest does
/// not supply one. `%A`/`%B` are replaced by the treatments' file keys.
pub const DEFAULT_PAIRWISE_TEMPLATE: &str = "./pairwise_tests/%A_%B.txt";

/// Invariant: the comparison-wide minimum p-value ignores values that
/// are exactly zero or NaN.
///
/// Fold `candidate` into a running minimum, returning the new minimum.
pub fn fold_min_p_value(current: f64, candidate: f64) -> f64 {
    if candidate != 0.0 && !candidate.is_nan() && candidate < current {
        candidate
    } else {
        current
    }
}

/// Invariant: brushed-region tests exclude records with an absent value
/// on any tested field.
pub fn within_bounds(min: f64, max: f64, value: Option<f64>) -> bool {
    match value {
        Some(v) => v >= min && v <= max,
        None => false,
    }
}
