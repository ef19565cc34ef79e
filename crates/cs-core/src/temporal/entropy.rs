//! Smoothed temporal entropy of a cascade.

use chrono::TimeDelta;
use cs_config::analysis::{EntropyConfig, SupportMode};
use cs_math::smoothed_entropy_with_support;
use thiserror::Error;

use super::buckets::{BucketHistogram, TimeBuckets, Timestamp};

/// Default additive smoothing constant (Laplace).
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Caller-input errors of the estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntropyError {
    #[error("end time {end} precedes start time {start}")]
    InvalidInterval { start: Timestamp, end: Timestamp },

    #[error("bucket width {0} must be positive")]
    InvalidBucketWidth(TimeDelta),

    #[error("smoothing constant {0} must be positive and finite")]
    InvalidSmoothing(f64),
}

impl From<EntropyError> for cs_common::Error {
    fn from(err: EntropyError) -> Self {
        match err {
            EntropyError::InvalidInterval { start, end } => cs_common::Error::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            },
            EntropyError::InvalidBucketWidth(width) => {
                cs_common::Error::InvalidBucketWidth(width.to_string())
            }
            EntropyError::InvalidSmoothing(alpha) => cs_common::Error::InvalidSmoothing(alpha),
        }
    }
}

/// Buckets the smoothing mass is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Support {
    /// Buckets with at least one timestamp.
    #[default]
    Observed,
    /// Every bucket of the tiling.
    Full,
}

impl From<SupportMode> for Support {
    fn from(mode: SupportMode) -> Self {
        match mode {
            SupportMode::Observed => Support::Observed,
            SupportMode::Full => Support::Full,
        }
    }
}

/// Estimator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyOptions {
    pub bucket_width: TimeDelta,
    pub alpha: f64,
    pub support: Support,
}

impl Default for EntropyOptions {
    fn default() -> Self {
        Self {
            bucket_width: TimeDelta::hours(6),
            alpha: DEFAULT_ALPHA,
            support: Support::Observed,
        }
    }
}

impl EntropyOptions {
    /// Check the parameters that do not depend on the window.
    pub fn validate(&self) -> Result<(), EntropyError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(EntropyError::InvalidSmoothing(self.alpha));
        }
        if self.bucket_width <= TimeDelta::zero() {
            return Err(EntropyError::InvalidBucketWidth(self.bucket_width));
        }
        Ok(())
    }
}

impl From<&EntropyConfig> for EntropyOptions {
    fn from(cfg: &EntropyConfig) -> Self {
        let secs = i64::try_from(cfg.bucket_width_secs).unwrap_or(i64::MAX);
        Self {
            bucket_width: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
            alpha: cfg.alpha,
            support: cfg.support.into(),
        }
    }
}

/// Smoothed entropy (bits) of `timestamps` bucketed over `[start, end)`.
///
/// Only buckets that received a timestamp enter the distribution:
/// `p = (count + α) / (N + α·K)` with `K` the number of present buckets.
/// Empty input, or input with every timestamp outside the tiling, is 0.
pub fn estimate_entropy(
    timestamps: &[Timestamp],
    start: Timestamp,
    end: Timestamp,
    bucket_width: TimeDelta,
    alpha: f64,
) -> Result<f64, EntropyError> {
    let options = EntropyOptions {
        bucket_width,
        alpha,
        support: Support::Observed,
    };
    estimate_entropy_with(timestamps, start, end, &options)
}

/// [`estimate_entropy`] with an explicit smoothing support.
pub fn estimate_entropy_with(
    timestamps: &[Timestamp],
    start: Timestamp,
    end: Timestamp,
    options: &EntropyOptions,
) -> Result<f64, EntropyError> {
    let histogram = histogram(timestamps, start, end, options)?;
    Ok(entropy_of(&histogram, options))
}

/// Validate parameters and count `timestamps` into buckets.
pub fn histogram(
    timestamps: &[Timestamp],
    start: Timestamp,
    end: Timestamp,
    options: &EntropyOptions,
) -> Result<BucketHistogram, EntropyError> {
    options.validate()?;
    let buckets = TimeBuckets::new(start, end, options.bucket_width)?;
    Ok(BucketHistogram::from_timestamps(buckets, timestamps))
}

/// Smoothed entropy of an already-built histogram.
pub fn entropy_of(histogram: &BucketHistogram, options: &EntropyOptions) -> f64 {
    let counts = histogram.counts();
    if counts.is_empty() {
        return 0.0;
    }
    let support = match options.support {
        Support::Observed => counts.len(),
        Support::Full => histogram.buckets().len().max(counts.len()),
    };
    smoothed_entropy_with_support(&counts, options.alpha, support)
}
