// ============================================================
// Layer 2 — BuildUseCase
// ============================================================
// Turns a directory of recordings plus transcripts into a
// dataset manifest:
//
//   Step 1: Discover audio files       (Layer 4 - data)
//   Step 2: Load transcripts           (Layer 4 - data)
//   Step 3: Pair audio with transcript (by path relative to
//           the audio directory, extension dropped)
//   Step 4: Probe each duration        (Layer 4 - data)
//   Step 5: Save the manifest          (Layer 6 - infra)
//
// A recording without a transcript is skipped with a warning.
// A recording whose duration cannot be read fails the build:
// the bucket sampler needs a duration for every item.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::data::{
    audio_io::probe_duration,
    scanner::AudioScanner,
    transcripts::load_transcripts,
};
use crate::domain::{audio_record::AudioRecord, traits::AudioSource};
use crate::infra::manifest::Manifest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub audio_dir:   PathBuf,
    pub transcripts: PathBuf,
    pub manifest:    PathBuf,
}

pub struct BuildUseCase {
    config: BuildConfig,
}

impl BuildUseCase {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build and save the manifest, returning it as well.
    pub fn execute(&self) -> Result<Manifest> {
        let cfg = &self.config;

        let scanner = AudioScanner::new(&cfg.audio_dir);
        let audio   = scanner.discover()?;

        let transcripts = load_transcripts(&cfg.transcripts)?;

        // Discovered paths are canonical, so strip a canonical root
        let root = fs::canonicalize(&cfg.audio_dir).unwrap_or_else(|_| cfg.audio_dir.clone());

        let mut records = Vec::with_capacity(audio.len());
        let mut skipped = 0usize;

        for path in audio {
            let relative = path.strip_prefix(&root).unwrap_or(&path);
            let Some(sentence) = transcripts.lookup(relative, &path) else {
                tracing::warn!("Skipping '{}': no transcript", path.display());
                skipped += 1;
                continue;
            };

            let duration = probe_duration(&path)
                .with_context(|| format!("Cannot measure duration of '{}'", path.display()))?;

            let sentence = sentence.to_string();
            records.push(AudioRecord::new(path, sentence, duration));
        }

        let manifest = Manifest::new(records);
        if manifest.is_empty() {
            tracing::warn!(
                "No recording in '{}' matched a transcript in '{}'",
                cfg.audio_dir.display(),
                cfg.transcripts.display()
            );
        }
        manifest.save(&cfg.manifest)?;

        tracing::info!(
            "Built manifest: {} recordings, {:.1} s total, {} skipped → '{}'",
            manifest.len(),
            manifest.total_duration(),
            skipped,
            cfg.manifest.display()
        );
        Ok(manifest)
    }
}
