//! Property-based tests for cs-math entropy and summary functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use cs_math::smoothing::{smoothed_probs, SmoothingParams};
use cs_math::{
    neumaier_sum, shannon_entropy, smoothed_entropy, smoothed_entropy_with_support, Summary,
};
use proptest::prelude::*;

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn log2_support(k: usize) -> f64 {
    (k.max(1) as f64).log2()
}

fn counts_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..500, 1..32)
}

// ============================================================================
// smoothed entropy properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Entropy is non-negative and bounded by log2 of the support.
    #[test]
    fn smoothed_entropy_bounded(counts in counts_strategy(), alpha in 0.01..10.0f64) {
        let h = smoothed_entropy(&counts, alpha);
        prop_assert!(h >= -TOL, "H={} should be >= 0", h);
        prop_assert!(h <= log2_support(counts.len()) + TOL,
            "H={} exceeds log2({})", h, counts.len());
    }

    /// Entropy depends only on the multiset of counts, not their order.
    #[test]
    fn smoothed_entropy_permutation_invariant(counts in counts_strategy(), alpha in 0.01..10.0f64) {
        let mut reversed = counts.clone();
        reversed.reverse();
        let mut sorted = counts.clone();
        sorted.sort_unstable();
        let h = smoothed_entropy(&counts, alpha);
        prop_assert!((h - smoothed_entropy(&reversed, alpha)).abs() <= TOL);
        prop_assert!((h - smoothed_entropy(&sorted, alpha)).abs() <= TOL);
    }

    /// Larger smoothing constants pull toward uniform, never lowering entropy.
    #[test]
    fn smoothed_entropy_monotone_in_alpha(
        counts in counts_strategy(),
        a in 0.01..10.0f64,
        b in 0.01..10.0f64,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let h_lo = smoothed_entropy(&counts, lo);
        let h_hi = smoothed_entropy(&counts, hi);
        prop_assert!(h_hi >= h_lo - TOL, "H(alpha={})={} < H(alpha={})={}", hi, h_hi, lo, h_lo);
    }

    /// Smoothed probabilities always form a distribution over the support.
    #[test]
    fn smoothed_probs_sum_to_one(counts in counts_strategy(), alpha in 0.01..10.0f64) {
        let params = SmoothingParams::new(alpha).unwrap();
        let probs = smoothed_probs(&counts, params, counts.len()).unwrap();
        let sum = neumaier_sum(&probs);
        prop_assert!((sum - 1.0).abs() <= TOL, "sum={}", sum);
    }

    /// Observed support equals full support when every category is observed.
    #[test]
    fn full_support_matches_observed_when_dense(counts in counts_strategy(), alpha in 0.01..10.0f64) {
        let observed = smoothed_entropy(&counts, alpha);
        let full = smoothed_entropy_with_support(&counts, alpha, counts.len());
        prop_assert!((observed - full).abs() <= TOL);
    }

    /// Widening the support with empty categories never lowers entropy.
    #[test]
    fn wider_support_not_lower(counts in counts_strategy(), extra in 0usize..16, alpha in 0.01..10.0f64) {
        let observed = smoothed_entropy(&counts, alpha);
        let full = smoothed_entropy_with_support(&counts, alpha, counts.len() + extra);
        prop_assert!(full >= observed - TOL);
    }

    /// Shannon entropy of a uniform distribution is log2(k).
    #[test]
    fn shannon_uniform(k in 1usize..64) {
        let probs = vec![1.0 / k as f64; k];
        prop_assert!((shannon_entropy(&probs) - log2_support(k)).abs() <= TOL);
    }
}

// ============================================================================
// summary properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// min <= mean <= max and std is non-negative.
    #[test]
    fn summary_ordering(values in prop::collection::vec(-1e6..1e6f64, 1..100)) {
        let s = Summary::from_values(&values).unwrap();
        prop_assert!(s.min <= s.mean + 1e-6);
        prop_assert!(s.mean <= s.max + 1e-6);
        prop_assert!(s.std >= 0.0);
        prop_assert_eq!(s.count, values.len());
    }

    /// Shifting every value shifts the mean and leaves std unchanged.
    #[test]
    fn summary_shift_invariance(values in prop::collection::vec(0usize..200, 1..50), shift in 0usize..1000) {
        let base = Summary::from_counts(&values).unwrap();
        let shifted: Vec<usize> = values.iter().map(|v| v + shift).collect();
        let moved = Summary::from_counts(&shifted).unwrap();
        prop_assert!((moved.mean - base.mean - shift as f64).abs() <= 1e-6);
        prop_assert!((moved.std - base.std).abs() <= 1e-6);
    }
}
