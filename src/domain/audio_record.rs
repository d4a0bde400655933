// ============================================================
// Layer 3 — Audio Record Domain Types
// ============================================================
// Two views of one dataset row:
//
//   AudioRecord  — what the manifest stores: where the audio
//                  lives, what was said, and how long it is.
//                  Cheap to hold for every item in a corpus.
//
//   AudioSample  — the same row with its waveform decoded into
//                  memory, ready for collation.
//
// The bucketing planner only ever reads the duration, through
// the HasDuration trait, so it works with either view.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::traits::HasDuration;

/// One row of a dataset manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRecord {
    /// Absolute path to the audio file
    pub path: PathBuf,

    /// Transcript of the recording
    pub sentence: String,

    /// Length of the recording in seconds
    pub duration: f64,
}

impl AudioRecord {
    pub fn new(path: impl Into<PathBuf>, sentence: impl Into<String>, duration: f64) -> Self {
        Self {
            path:     path.into(),
            sentence: sentence.into(),
            duration,
        }
    }
}

impl HasDuration for AudioRecord {
    fn duration(&self) -> f64 {
        self.duration
    }
}

/// A record with its audio decoded to mono `f32` samples.
#[derive(Debug, Clone)]
pub struct AudioSample {
    pub record:        AudioRecord,
    pub samples:       Vec<f32>,
    pub sampling_rate: u32,
}

impl AudioSample {
    /// Number of decoded frames
    pub fn num_frames(&self) -> usize {
        self.samples.len()
    }
}

impl HasDuration for AudioSample {
    fn duration(&self) -> f64 {
        self.record.duration
    }
}
