//! Fixed-width time buckets and sparse per-bucket counts.
//!
//! Buckets are half-open `[start + iΔ, start + (i+1)Δ)` intervals tiling
//! `[start, end)`. The final bucket is not clipped, so its upper edge may lie
//! past `end`. Assignment is arithmetic; no interval list is materialized.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeDelta};

use super::entropy::EntropyError;

/// Timezone-aware event time.
pub type Timestamp = DateTime<FixedOffset>;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Total nanoseconds of a duration without overflow.
fn total_nanos(delta: TimeDelta) -> i128 {
    delta.num_seconds() as i128 * NANOS_PER_SEC + delta.subsec_nanos() as i128
}

/// Tiling of a time window into equal-width buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBuckets {
    start: Timestamp,
    width: TimeDelta,
    width_nanos: i128,
    len: usize,
}

impl TimeBuckets {
    /// Tile `[start, end)` with buckets of `width`.
    ///
    /// The bucket count is `ceil((end - start) / width)`; `start == end`
    /// yields zero buckets.
    pub fn new(start: Timestamp, end: Timestamp, width: TimeDelta) -> Result<Self, EntropyError> {
        if end < start {
            return Err(EntropyError::InvalidInterval { start, end });
        }
        let width_nanos = total_nanos(width);
        if width_nanos <= 0 {
            return Err(EntropyError::InvalidBucketWidth(width));
        }

        let span = total_nanos(end - start);
        let count = (span + width_nanos - 1) / width_nanos;
        let len = usize::try_from(count).unwrap_or(usize::MAX);

        Ok(Self {
            start,
            width,
            width_nanos,
            len,
        })
    }

    /// Number of buckets in the tiling.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lower edge of the first bucket.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn width(&self) -> TimeDelta {
        self.width
    }

    /// Index of the bucket containing `t`, or None if `t` is outside the tiling.
    pub fn bucket_of(&self, t: &Timestamp) -> Option<usize> {
        if *t < self.start {
            return None;
        }
        let offset = total_nanos(*t - self.start);
        let index = usize::try_from(offset / self.width_nanos).ok()?;
        (index < self.len).then_some(index)
    }

    /// Lower edge of bucket `index`.
    ///
    /// `bucket_start(len())` is the upper edge of the tiling. Returns None
    /// past that or when the instant is not representable.
    pub fn bucket_start(&self, index: usize) -> Option<Timestamp> {
        if index > self.len {
            return None;
        }
        let offset = self.width_nanos.checked_mul(index as i128)?;
        let offset = i64::try_from(offset).ok()?;
        self.start
            .checked_add_signed(TimeDelta::nanoseconds(offset))
    }

    /// Upper edge of the final bucket (may exceed the requested end).
    pub fn upper_edge(&self) -> Option<Timestamp> {
        self.bucket_start(self.len)
    }
}

/// Sparse bucket → count mapping.
///
/// Only buckets that received at least one timestamp are present.
#[derive(Debug, Clone)]
pub struct BucketHistogram {
    buckets: TimeBuckets,
    counts: BTreeMap<usize, u64>,
    dropped: usize,
}

impl BucketHistogram {
    /// Count `timestamps` into `buckets`, dropping those outside the tiling.
    pub fn from_timestamps(buckets: TimeBuckets, timestamps: &[Timestamp]) -> Self {
        let mut counts = BTreeMap::new();
        let mut dropped = 0;
        for t in timestamps {
            match buckets.bucket_of(t) {
                Some(index) => *counts.entry(index).or_insert(0u64) += 1,
                None => dropped += 1,
            }
        }
        Self {
            buckets,
            counts,
            dropped,
        }
    }

    pub fn buckets(&self) -> &TimeBuckets {
        &self.buckets
    }

    /// Number of buckets with a non-zero count.
    pub fn present(&self) -> usize {
        self.counts.len()
    }

    /// Sum of counts over present buckets.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Timestamps that fell outside the tiling.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Counts of present buckets in bucket order.
    pub fn counts(&self) -> Vec<u64> {
        self.counts.values().copied().collect()
    }

    /// Count for bucket `index` (0 when absent).
    pub fn count(&self, index: usize) -> u64 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Present buckets as `(bucket start, count)` in time order.
    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, u64)> + '_ {
        self.counts.iter().filter_map(|(&index, &count)| {
            self.buckets.bucket_start(index).map(|start| (start, count))
        })
    }
}
