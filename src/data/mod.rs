// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a directory of recordings and padded
// tensor batches. Building a dataset flows like this:
//
//   audio dir + transcripts
//       │
//       ▼
//   AudioScanner      → finds .wav / .mp3 files
//       │
//       ▼
//   load_transcripts  → stem → sentence table
//       │
//       ▼
//   probe_duration    → seconds per file (symphonia)
//       │
//       ▼
//   manifest          → Vec<AudioRecord> (Layer 6 persists it)
//
// Training-time batching then flows like this:
//
//   manifest records
//       │
//       ▼
//   BucketSampler     → plans which indices form each batch
//       │
//       ▼
//   AudioDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   AudioBatcher      → pads each planned batch into tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Recursive discovery of audio files
pub mod scanner;

/// Transcript file / directory parsing
pub mod transcripts;

/// Duration probing and decoding via symphonia
pub mod audio_io;

/// mp3 → wav conversion through sox
pub mod converter;

/// In-memory decoded dataset (Burn Dataset)
pub mod dataset;

/// Duration-bucketed batch planning
pub mod sampler;

/// Padding collation (Burn Batcher)
pub mod batcher;

#[cfg(test)]
pub(crate) mod fixtures;
