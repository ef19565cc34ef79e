//! Numerically careful primitives shared by the entropy and summary code.

/// Entropy contribution of a single probability mass, in bits: `-p * log2(p)`.
///
/// Returns 0 for `p <= 0` (the limit of `p log p` as `p -> 0`) and NaN for NaN.
pub fn entropy_term(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    -p * p.log2()
}

/// Compensated (Neumaier) summation.
///
/// Keeps the running error term so that long sums of small probabilities
/// do not drift. Returns 0 for empty input; NaN propagates.
pub fn neumaier_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn entropy_term_endpoints() {
        assert_eq!(entropy_term(0.0), 0.0);
        assert_eq!(entropy_term(1.0), 0.0);
        assert_eq!(entropy_term(-0.5), 0.0);
        assert!(entropy_term(f64::NAN).is_nan());
    }

    #[test]
    fn entropy_term_half_is_half_bit() {
        assert!(approx_eq(entropy_term(0.5), 0.5, 1e-12));
    }

    #[test]
    fn neumaier_sum_basic() {
        assert_eq!(neumaier_sum(&[]), 0.0);
        assert!(approx_eq(neumaier_sum(&[0.1, 0.2, 0.3]), 0.6, 1e-15));
    }

    #[test]
    fn neumaier_sum_recovers_cancellation() {
        // Naive summation returns 0.0 here.
        let out = neumaier_sum(&[1.0, 1e100, 1.0, -1e100]);
        assert!(approx_eq(out, 2.0, 1e-12));
    }

    #[test]
    fn neumaier_sum_nan_propagates() {
        assert!(neumaier_sum(&[1.0, f64::NAN]).is_nan());
    }
}
