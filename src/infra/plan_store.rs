// ============================================================
// Layer 6 — Plan Store
// ============================================================
// Persists what the `plan` command produced so a training
// run (or a person) can inspect or replay it:
//
//   out/
//     plan_config.json   ← boundaries, batch sizes, seed, ...
//     epoch_1.json       ← [{ "bucket": 0, "indices": [...] }, ...]
//     epoch_2.json
//     ...
//
// Reference: serde_json crate documentation

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::PathBuf};

use crate::data::sampler::PlannedBatch;

pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    /// Create the store, making the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Save the configuration that produced the plans.
    pub fn save_config<C: Serialize>(&self, cfg: &C) -> Result<()> {
        let path = self.dir.join("plan_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved plan config to '{}'", path.display());
        Ok(())
    }

    /// Save one epoch's batches; returns the file written.
    pub fn save_epoch(&self, epoch: usize, batches: &[PlannedBatch]) -> Result<PathBuf> {
        let path = self.epoch_path(epoch);
        let json = serde_json::to_string(batches)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write plan to '{}'", path.display()))?;
        Ok(path)
    }

    /// Read back a saved epoch plan.
    pub fn load_epoch(&self, epoch: usize) -> Result<Vec<PlannedBatch>> {
        let path = self.epoch_path(epoch);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read plan '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn epoch_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("epoch_{epoch}.json"))
    }
}
