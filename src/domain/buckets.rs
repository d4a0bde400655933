// ============================================================
// Layer 3 — Bucket Configuration
// ============================================================
// Describes how durations are partitioned into buckets and
// how many items each bucket may put into one batch.
//
// Boundaries are inclusive upper bounds:
//
//   boundaries  = [5, 10]
//   batch_sizes = [64, 32, 16]
//
//   bucket 0: (-inf,  5]  → batches of up to 64
//   bucket 1: (5,    10]  → batches of up to 32
//   bucket 2: (10, +inf)  → batches of up to 16
//
// A configuration is validated once in BucketConfig::new.
// After that, classify() is total: every real duration has
// exactly one bucket, so there is no "no bucket" case.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            thiserror crate documentation

use thiserror::Error;

/// Default duration thresholds in seconds.
pub const DEFAULT_BOUNDARIES: [f64; 5] = [5.0, 10.0, 15.0, 20.0, 25.0];

/// Default batch size per bucket (one more entry than the boundaries).
pub const DEFAULT_BATCH_SIZES: [usize; 6] = [64, 32, 16, 8, 4, 2];

/// Errors raised while configuring buckets or reading the duration table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BucketError {
    #[error("expected {expected} bucket batch sizes for {boundaries} boundaries, got {actual}")]
    SizeCountMismatch {
        boundaries: usize,
        expected:   usize,
        actual:     usize,
    },

    #[error("bucket boundary #{index} is not a finite number")]
    NonFiniteBoundary { index: usize },

    #[error("bucket boundary #{index} is not strictly greater than the previous one")]
    UnsortedBoundaries { index: usize },

    #[error("batch size for bucket {bucket} must be at least 1")]
    ZeroBatchSize { bucket: usize },

    #[error("dataset has no item at index {index}")]
    MissingItem { index: usize },

    #[error("item {index} has an invalid duration ({duration})")]
    InvalidDuration { index: usize, duration: f64 },
}

// ─── BucketConfig ─────────────────────────────────────────────────────────────
/// Validated boundary list plus one batch size per bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketConfig {
    boundaries:  Vec<f64>,
    batch_sizes: Vec<usize>,
}

impl BucketConfig {
    /// Build a configuration, rejecting anything that would make
    /// classification ambiguous or batching impossible.
    pub fn new(boundaries: Vec<f64>, batch_sizes: Vec<usize>) -> Result<Self, BucketError> {
        let expected = boundaries.len() + 1;
        if batch_sizes.len() != expected {
            return Err(BucketError::SizeCountMismatch {
                boundaries: boundaries.len(),
                expected,
                actual: batch_sizes.len(),
            });
        }

        for (index, b) in boundaries.iter().enumerate() {
            if !b.is_finite() {
                return Err(BucketError::NonFiniteBoundary { index });
            }
            if index > 0 && *b <= boundaries[index - 1] {
                return Err(BucketError::UnsortedBoundaries { index });
            }
        }

        if let Some(bucket) = batch_sizes.iter().position(|&s| s == 0) {
            return Err(BucketError::ZeroBatchSize { bucket });
        }

        Ok(Self { boundaries, batch_sizes })
    }

    /// Return the bucket whose interval contains `duration`.
    ///
    /// `partition_point` finds the first boundary that is `>= duration`,
    /// which is exactly the first interval with `duration <= upper`.
    /// Values above every boundary fall through to the last bucket and
    /// negative values land in bucket 0.
    pub fn classify(&self, duration: f64) -> usize {
        self.boundaries.partition_point(|&b| b < duration)
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn batch_sizes(&self) -> &[usize] {
        &self.batch_sizes
    }

    pub fn num_buckets(&self) -> usize {
        self.batch_sizes.len()
    }

    /// Maximum number of items per batch for `bucket`.
    pub fn batch_size(&self, bucket: usize) -> usize {
        self.batch_sizes[bucket]
    }

    /// The (exclusive lower, inclusive upper) duration bounds of `bucket`.
    pub fn interval(&self, bucket: usize) -> (f64, f64) {
        let lower = if bucket == 0 {
            f64::NEG_INFINITY
        } else {
            self.boundaries[bucket - 1]
        };
        let upper = self
            .boundaries
            .get(bucket)
            .copied()
            .unwrap_or(f64::INFINITY);
        (lower, upper)
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            boundaries:  DEFAULT_BOUNDARIES.to_vec(),
            batch_sizes: DEFAULT_BATCH_SIZES.to_vec(),
        }
    }
}
