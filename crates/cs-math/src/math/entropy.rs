//! Shannon entropy of discrete distributions, in bits.
//!
//! The smoothed estimators take raw histogram counts and apply additive
//! smoothing (see [`crate::math::smoothing`]) before computing
//! `H = -Σ p_i log2 p_i`.
//!
//! Invalid smoothing constants yield NaN; callers that need typed errors
//! validate before calling.

use super::smoothing::{smoothed_probs, unobserved_prob, SmoothingParams};
use super::stable::{entropy_term, neumaier_sum};

/// Shannon entropy (bits) of a probability vector.
///
/// Zero masses contribute nothing. The input is not renormalized.
pub fn shannon_entropy(probs: &[f64]) -> f64 {
    let terms: Vec<f64> = probs.iter().map(|&p| entropy_term(p)).collect();
    neumaier_sum(&terms)
}

/// Additively smoothed entropy over the observed categories only.
///
/// Each entry of `counts` is one category; the smoothing support is
/// `counts.len()`. Empty input returns exactly 0.
pub fn smoothed_entropy(counts: &[u64], alpha: f64) -> f64 {
    smoothed_entropy_with_support(counts, alpha, counts.len())
}

/// Additively smoothed entropy over a support of `support` categories.
///
/// `counts` holds the observed categories; `support - counts.len()` further
/// categories are treated as zero-count and each receive `α / (N + α·K)`.
/// Empty input returns exactly 0 regardless of `support`.
///
/// Returns NaN if alpha is invalid or `support < counts.len()`.
pub fn smoothed_entropy_with_support(counts: &[u64], alpha: f64, support: usize) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let Some(params) = SmoothingParams::new(alpha) else {
        return f64::NAN;
    };
    let Some(probs) = smoothed_probs(counts, params, support) else {
        return f64::NAN;
    };

    let mut terms: Vec<f64> = probs.iter().map(|&p| entropy_term(p)).collect();
    let unobserved = support - counts.len();
    if unobserved > 0 {
        if let Some(p) = unobserved_prob(counts, params, support) {
            terms.push(unobserved as f64 * entropy_term(p));
        }
    }
    neumaier_sum(&terms)
}
