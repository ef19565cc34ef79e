//! Additive (Laplace / Lidstone) smoothing of categorical counts.
//!
//! Additive smoothing is the posterior mean of a multinomial under a
//! symmetric Dirichlet prior:
//! - Prior: `p ~ Dirichlet(α, …, α)` over `K` categories
//! - Likelihood: `n | p ~ Multinomial(N, p)`
//! - Posterior mean: `E[p_i | n] = (n_i + α) / (N + α·K)`
//!
//! `α = 1` is Laplace smoothing.

use serde::{Deserialize, Serialize};

/// Smoothing constant for additive smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SmoothingParams {
    alpha: f64,
}

impl SmoothingParams {
    /// Create smoothing parameters with validation.
    ///
    /// Returns None if alpha is non-positive, NaN, or infinite.
    pub fn new(alpha: f64) -> Option<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return None;
        }
        Some(Self { alpha })
    }

    /// Laplace smoothing (α = 1).
    pub fn laplace() -> Self {
        Self { alpha: 1.0 }
    }

    /// The smoothing constant.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self::laplace()
    }
}

/// Denominator of the smoothed distribution: `N + α·K`.
///
/// `support` is the number of categories `K` the mass is spread over; it
/// must be at least `counts.len()`.
pub fn normalizer(counts: &[u64], params: SmoothingParams, support: usize) -> Option<f64> {
    if support < counts.len() {
        return None;
    }
    let total: u64 = counts.iter().sum();
    Some(total as f64 + params.alpha * support as f64)
}

/// Smoothed probability for each observed count.
///
/// `p_i = (n_i + α) / (N + α·K)` where `K = support`. When `support` exceeds
/// `counts.len()`, the remaining categories are unobserved (zero counts) and
/// hold the leftover mass `α / (N + α·K)` each; they are not included in the
/// returned vector.
///
/// Returns None if `support < counts.len()` or `support == 0`.
pub fn smoothed_probs(counts: &[u64], params: SmoothingParams, support: usize) -> Option<Vec<f64>> {
    if support == 0 {
        return None;
    }
    let denom = normalizer(counts, params, support)?;
    Some(
        counts
            .iter()
            .map(|&n| (n as f64 + params.alpha) / denom)
            .collect(),
    )
}

/// Smoothed probability assigned to each unobserved category.
pub fn unobserved_prob(counts: &[u64], params: SmoothingParams, support: usize) -> Option<f64> {
    if support == 0 {
        return None;
    }
    let denom = normalizer(counts, params, support)?;
    Some(params.alpha / denom)
}
