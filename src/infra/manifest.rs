// ============================================================
// Layer 6 — Dataset Manifest
// ============================================================
// The manifest is the built dataset: one AudioRecord per
// recording, in index order. Item indices used by the bucket
// sampler are positions in this list, so the order written
// here is the order every later step sees.
//
// Stored as pretty JSON:
//
//   {
//     "records": [
//       { "path": "/data/wav/utt_0001.wav",
//         "sentence": "the quick brown fox",
//         "duration": 3.42 },
//       ...
//     ]
//   }
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::domain::audio_record::AudioRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub records: Vec<AudioRecord>,
}

impl Manifest {
    pub fn new(records: Vec<AudioRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.records.iter().map(|r| r.duration).sum()
    }

    /// Write the manifest, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved manifest with {} records to '{}'", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| {
            format!(
                "Cannot read manifest '{}'. Have you run 'build' first?",
                path.display()
            )
        })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed manifest '{}'", path.display()))
    }
}
