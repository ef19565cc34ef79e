//! Descriptive summary statistics (mean, population std, min, max).

use serde::{Deserialize, Serialize};

use super::stable::neumaier_sum;

/// Summary of a sample of real values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values summarized.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divides by `n`, not `n - 1`).
    pub std: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Summary {
    /// Summarize a slice of values.
    ///
    /// Returns None for empty input or if any value is NaN.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| v.is_nan()) {
            return None;
        }
        let n = values.len() as f64;
        let mean = neumaier_sum(values) / n;
        let squared: Vec<f64> = values.iter().map(|v| (v - mean) * (v - mean)).collect();
        let variance = neumaier_sum(&squared) / n;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some(Summary {
            count: values.len(),
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }

    /// Summarize integer counts (e.g. token lengths).
    pub fn from_counts(counts: &[usize]) -> Option<Self> {
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::from_values(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn empty_is_none() {
        assert!(Summary::from_values(&[]).is_none());
        assert!(Summary::from_counts(&[]).is_none());
    }

    #[test]
    fn nan_is_none() {
        assert!(Summary::from_values(&[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn population_std() {
        let s = Summary::from_counts(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!(s.count, 8);
        assert!(approx_eq(s.mean, 5.0, 1e-12));
        assert!(approx_eq(s.std, 2.0, 1e-12));
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
    }

    #[test]
    fn single_value_has_zero_std() {
        let s = Summary::from_values(&[3.5]).unwrap();
        assert_eq!(s.std, 0.0);
        assert_eq!(s.min, s.max);
    }
}
