// ============================================================
// Layer 2 — PlanUseCase
// ============================================================
// Plans N epochs of duration-bucketed batches over a manifest:
//
//   Step 1: Load the manifest                 (Layer 6 - infra)
//   Step 2: Validate the bucket configuration (Layer 3 - domain)
//   Step 3: Build the sampler from durations  (Layer 4 - data)
//   Step 4: Per epoch: plan, log statistics,
//           save the plan                     (Layer 6 - infra)
//   Step 5: Optionally decode the audio and collate every
//           planned batch, to check what a training step
//           would actually receive            (Layer 4 - data)
//
// The sampler is seeded once, so epoch 1, 2, ... are different
// shuffles, and rerunning with the same seed and worker id
// reproduces the same epochs.

use anyhow::{Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    data::{dataloader::batcher::Batcher, dataset::InMemDataset},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    batcher::{fetch_batch, AudioBatch, AudioBatcher},
    dataset::AudioDataset,
    sampler::{worker_seed, BucketSampler, PlannedBatch},
};
use crate::domain::buckets::{BucketConfig, DEFAULT_BATCH_SIZES, DEFAULT_BOUNDARIES};
use crate::infra::{
    manifest::Manifest,
    plan_stats::{BucketStats, PlanStatsLogger},
    plan_store::PlanStore,
};

type CollateBackend = NdArray;

// ─── Plan Configuration ──────────────────────────────────────────────────────
// Saved next to the plans as plan_config.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub manifest:    PathBuf,
    pub output_dir:  PathBuf,
    pub boundaries:  Vec<f64>,
    pub batch_sizes: Vec<usize>,
    pub epochs:      usize,
    pub seed:        u64,
    pub worker_id:   usize,
    pub load_audio:  bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            manifest:    PathBuf::from("data/manifest.json"),
            output_dir:  PathBuf::from("plans"),
            boundaries:  DEFAULT_BOUNDARIES.to_vec(),
            batch_sizes: DEFAULT_BATCH_SIZES.to_vec(),
            epochs:      1,
            seed:        42,
            worker_id:   0,
            load_audio:  false,
        }
    }
}

/// What a planning run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    /// Items in the manifest (the sampler's length)
    pub items: usize,

    /// Batches in every epoch
    pub batches_per_epoch: usize,

    /// Saved plan files, one per epoch
    pub plan_files: Vec<PathBuf>,
}

pub struct PlanUseCase {
    config: PlanConfig,
}

impl PlanUseCase {
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PlanSummary> {
        let cfg = &self.config;

        // ── Steps 1–3: manifest → bucket config → sampler ─────────────────────
        let manifest = Manifest::load(&cfg.manifest)?;
        let buckets  = BucketConfig::new(cfg.boundaries.clone(), cfg.batch_sizes.clone())
            .context("Invalid bucket configuration")?;

        let seed        = worker_seed(cfg.seed, cfg.worker_id);
        let records     = InMemDataset::new(manifest.records.clone());
        let mut sampler = BucketSampler::from_dataset(&records, buckets, seed)
            .with_context(|| format!("Cannot read durations from '{}'", cfg.manifest.display()))?;

        tracing::info!(
            "Planning {} epochs over {} items ({} batches per epoch), bucket sizes {:?}",
            cfg.epochs,
            sampler.len(),
            sampler.num_batches(),
            sampler.bucket_counts(),
        );

        let store = PlanStore::new(&cfg.output_dir)?;
        store.save_config(cfg)?;
        let stats = PlanStatsLogger::new(store.dir())?;

        let audio = if cfg.load_audio {
            Some(AudioDataset::load(manifest.records)?)
        } else {
            None
        };

        // ── Step 4/5: one fresh plan per epoch ────────────────────────────────
        let mut plan_files = Vec::with_capacity(cfg.epochs);
        for epoch in 1..=cfg.epochs {
            let plan: Vec<PlannedBatch> = sampler.iter().collect();

            stats.log(&BucketStats::from_plan(epoch, &plan, sampler.buckets()))?;

            if let Some(dataset) = &audio {
                let fill = collate_epoch(dataset, &plan)?;
                tracing::info!("Epoch {}: {:.1}% of collated frames are audio", epoch, fill * 100.0);
            }

            let path = store.save_epoch(epoch, &plan)?;
            tracing::info!("Epoch {}: {} batches → '{}'", epoch, plan.len(), path.display());
            plan_files.push(path);
        }

        Ok(PlanSummary {
            items: sampler.len(),
            batches_per_epoch: sampler.num_batches(),
            plan_files,
        })
    }
}

/// Collate every planned batch and return the fraction of tensor
/// frames that hold real audio rather than padding.
fn collate_epoch(dataset: &AudioDataset, plan: &[PlannedBatch]) -> Result<f64> {
    let device  = NdArrayDevice::default();
    let batcher = AudioBatcher::default();

    let mut real_frames   = 0usize;
    let mut tensor_frames = 0usize;

    for planned in plan {
        let items = fetch_batch(dataset, &planned.indices)?;
        real_frames += items.iter().map(|s| s.num_frames()).sum::<usize>();

        let batch: AudioBatch<CollateBackend> = batcher.batch(items, &device);
        let [rows, cols] = batch.waveforms.dims();
        tensor_frames += rows * cols;

        tracing::debug!(
            "bucket {} → waveforms [{}, {}]",
            planned.bucket,
            rows,
            cols
        );
    }

    Ok(if tensor_frames == 0 {
        1.0
    } else {
        real_frames as f64 / tensor_frames as f64
    })
}
