// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the planner, the dataset helpers and
// whatever storage a caller actually uses:
//
//   HasDuration  → the only thing the bucketing planner needs
//                  to know about an item
//   AudioSource  → anything that can list the audio files of
//                  a corpus (directory scan today, maybe a
//                  remote bucket listing later)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::PathBuf;

// ─── HasDuration ──────────────────────────────────────────────────────────────
/// An item with a length in seconds.
///
/// Implementations:
///   - AudioRecord → manifest rows
///   - AudioSample → decoded rows
pub trait HasDuration {
    fn duration(&self) -> f64;
}

impl HasDuration for f64 {
    fn duration(&self) -> f64 {
        *self
    }
}

// ─── AudioSource ──────────────────────────────────────────────────────────────
/// Any component that can discover the audio files of a corpus.
pub trait AudioSource {
    /// Return every audio file path, sorted, as absolute paths.
    fn discover(&self) -> Result<Vec<PathBuf>>;
}
