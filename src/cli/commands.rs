// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `build`, `plan` and `convert`.
//
// Bucket boundaries and batch sizes are comma-separated lists:
//
//   --boundaries 5,10,15,20,25 --batch-sizes 64,32,16,8,4,2
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{build_use_case::BuildConfig, plan_use_case::PlanConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan audio + transcripts and write a dataset manifest
    Build(BuildArgs),

    /// Plan duration-bucketed batches over a manifest
    Plan(PlanArgs),

    /// Convert every .mp3 in a directory to 16 kHz mono WAV (needs sox)
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory searched recursively for .wav / .mp3 files
    #[arg(long, default_value = "data/audio")]
    pub audio_dir: PathBuf,

    /// Tab-separated transcript file, or a directory of .txt transcripts
    #[arg(long, default_value = "data/transcripts.tsv")]
    pub transcripts: PathBuf,

    /// Where to write the manifest
    #[arg(long, default_value = "data/manifest.json")]
    pub manifest: PathBuf,
}

impl From<BuildArgs> for BuildConfig {
    fn from(a: BuildArgs) -> Self {
        BuildConfig {
            audio_dir:   a.audio_dir,
            transcripts: a.transcripts,
            manifest:    a.manifest,
        }
    }
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Manifest written by `build`
    #[arg(long, default_value = "data/manifest.json")]
    pub manifest: PathBuf,

    /// Directory for epoch plans, plan_config.json and plan_stats.csv
    #[arg(long, default_value = "plans")]
    pub output_dir: PathBuf,

    /// Upper duration bound (seconds, inclusive) of every bucket but the last
    #[arg(long, value_delimiter = ',', default_value = "5,10,15,20,25")]
    pub boundaries: Vec<f64>,

    /// Maximum batch size per bucket; one more entry than --boundaries
    #[arg(long, value_delimiter = ',', default_value = "64,32,16,8,4,2")]
    pub batch_sizes: Vec<usize>,

    /// Number of epochs to plan
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Base seed for shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Data-loading worker id; each worker gets its own derived seed
    #[arg(long, default_value_t = 0)]
    pub worker_id: usize,

    /// Decode the audio and collate every planned batch
    #[arg(long)]
    pub load_audio: bool,
}

impl From<PlanArgs> for PlanConfig {
    fn from(a: PlanArgs) -> Self {
        PlanConfig {
            manifest:    a.manifest,
            output_dir:  a.output_dir,
            boundaries:  a.boundaries,
            batch_sizes: a.batch_sizes,
            epochs:      a.epochs,
            seed:        a.seed,
            worker_id:   a.worker_id,
            load_audio:  a.load_audio,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory searched recursively for .mp3 files
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Directory receiving the .wav files
    #[arg(long)]
    pub output_dir: PathBuf,
}
