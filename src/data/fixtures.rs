// Test-only helpers: scratch directories and synthetic WAV files.

use std::{fs, path::{Path, PathBuf}};

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "audio-bucketing-{}-{}",
        name,
        std::process::id()
    ));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a 16-bit WAV of `frames` frames. The first channel holds
/// `level` in every frame, any other channel is silent.
pub fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize, level: i16) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..frames {
        writer.write_sample(level).unwrap();
        for _ in 1..channels {
            writer.write_sample(0i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}
