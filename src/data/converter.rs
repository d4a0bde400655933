// ============================================================
// Layer 4 — Format Converter
// ============================================================
// Converts compressed audio (mp3) to the 16 kHz / 16-bit /
// mono WAV that downstream training expects, by shelling out
// to sox:
//
//   sox input.mp3 -r 16000 -b 16 -c 1 output.wav
//
// sox must be on PATH. A failed or missing sox is an error;
// nothing is retried.

use anyhow::{bail, Context, Result};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::data::scanner::find_files;

/// Target format for converted files.
#[derive(Debug, Clone)]
pub struct SoxConverter {
    pub sample_rate: u32,
    pub bits:        u16,
    pub channels:    u16,
}

impl Default for SoxConverter {
    fn default() -> Self {
        Self { sample_rate: 16_000, bits: 16, channels: 1 }
    }
}

impl SoxConverter {
    /// Command-line arguments passed to sox for one conversion.
    pub fn sox_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            input.into(),
            "-r".into(),
            self.sample_rate.to_string().into(),
            "-b".into(),
            self.bits.to_string().into(),
            "-c".into(),
            self.channels.to_string().into(),
            output.into(),
        ]
    }

    /// Convert a single file.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let status = Command::new("sox")
            .args(self.sox_args(input, output))
            .status()
            .context("Cannot run sox. Is it installed and on PATH?")?;

        if !status.success() {
            bail!("sox failed on '{}' ({})", input.display(), status);
        }

        tracing::debug!("Converted '{}' → '{}'", input.display(), output.display());
        Ok(())
    }

    /// Convert every .mp3 under `input_dir` into `output_dir`, keeping
    /// each file stem. Returns the written WAV paths.
    pub fn convert_dir(&self, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Cannot create '{}'", output_dir.display()))?;

        let mut written = Vec::new();
        for mp3 in find_files(input_dir, &["mp3"])? {
            let wav = wav_target(&mp3, output_dir)?;
            self.convert(&mp3, &wav)?;
            written.push(wav);
        }

        tracing::info!(
            "Converted {} files into '{}'",
            written.len(),
            output_dir.display()
        );
        Ok(written)
    }
}

fn wav_target(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("'{}' has no file name", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(".wav");
    Ok(output_dir.join(name))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sox_args() {
        let args = SoxConverter::default().sox_args(Path::new("in.mp3"), Path::new("out.wav"));
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            vec!["in.mp3", "-r", "16000", "-b", "16", "-c", "1", "out.wav"]
        );
    }

    #[test]
    fn test_wav_target_keeps_stem() {
        let out = wav_target(Path::new("/data/mp3/utt.01.mp3"), Path::new("/data/wav")).unwrap();
        assert_eq!(out, PathBuf::from("/data/wav/utt.01.wav"));
    }

    #[test]
    fn test_empty_input_dir_converts_nothing() {
        let dir = crate::data::fixtures::scratch_dir("convert-empty");
        fs::create_dir_all(dir.join("in")).unwrap();

        let written = SoxConverter::default()
            .convert_dir(&dir.join("in"), &dir.join("out"))
            .unwrap();
        assert!(written.is_empty());
        assert!(dir.join("out").is_dir());
    }
}
