// ============================================================
// Layer 6 — Plan Statistics Logger
// ============================================================
// Records, per epoch and per bucket, how the plan came out:
//
//   epoch,bucket,lower,upper,items,batches,largest_batch
//   1,0,-inf,5,812,13,64
//   1,1,5,10,440,14,32
//   ...
//
// How to read it:
//   - items should be identical in every epoch (membership
//     depends only on duration, never on the shuffle)
//   - batches = ceil(items / batch size) for each bucket
//   - a bucket with very few items is a hint the boundaries
//     do not fit the corpus
//
// Output file: <output-dir>/plan_stats.csv

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::data::sampler::PlannedBatch;
use crate::domain::buckets::BucketConfig;

/// One CSV row: how one bucket was batched in one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub epoch:         usize,
    pub bucket:        usize,
    pub lower:         f64,
    pub upper:         f64,
    pub items:         usize,
    pub batches:       usize,
    pub largest_batch: usize,
}

impl BucketStats {
    /// Summarise an epoch plan, one row per bucket (empty buckets included).
    pub fn from_plan(epoch: usize, plan: &[PlannedBatch], buckets: &BucketConfig) -> Vec<Self> {
        let mut rows: Vec<Self> = (0..buckets.num_buckets())
            .map(|bucket| {
                let (lower, upper) = buckets.interval(bucket);
                Self { epoch, bucket, lower, upper, items: 0, batches: 0, largest_batch: 0 }
            })
            .collect();

        for batch in plan {
            let row = &mut rows[batch.bucket];
            row.items        += batch.len();
            row.batches      += 1;
            row.largest_batch = row.largest_batch.max(batch.len());
        }
        rows
    }
}

/// Appends bucket statistics to a CSV file.
pub struct PlanStatsLogger {
    csv_path: PathBuf,
}

impl PlanStatsLogger {
    /// Create the logger, writing the header if the file is new.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let csv_path = dir.join("plan_stats.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "epoch,bucket,lower,upper,items,batches,largest_batch")?;
            tracing::debug!("Created plan stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, rows: &[BucketStats]) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        for r in rows {
            writeln!(
                f,
                "{},{},{},{},{},{},{}",
                r.epoch, r.bucket, r.lower, r.upper, r.items, r.batches, r.largest_batch,
            )?;
        }
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
