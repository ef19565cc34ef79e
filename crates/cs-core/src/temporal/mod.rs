//! Time-bucketed smoothed entropy of reaction cascades.
//!
//! Reaction timestamps are counted into fixed-width buckets anchored at the
//! source post, and the additively smoothed Shannon entropy of the bucket
//! distribution measures how spread out the cascade is over time.

pub mod buckets;
pub mod entropy;

pub use buckets::{BucketHistogram, TimeBuckets, Timestamp};
pub use entropy::{
    entropy_of, estimate_entropy, estimate_entropy_with, histogram, EntropyError, EntropyOptions,
    Support, DEFAULT_ALPHA,
};
