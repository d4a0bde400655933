// ============================================================
// Layer 4 — Audio File Scanner
// ============================================================
// Finds every .wav and .mp3 file below a directory.
//
// Unlike a flat read_dir, corpora are usually nested
// (speaker/chapter/utterance.wav), so the whole tree is
// walked with walkdir. Paths are made absolute and sorted so
// that item indices are stable from one build to the next.
//
// Reference: walkdir crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::traits::AudioSource;

/// File extensions treated as audio
pub const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

/// Discovers audio files in a directory tree.
/// Implements the AudioSource trait from Layer 3.
pub struct AudioScanner {
    dir: PathBuf,
}

impl AudioScanner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl AudioSource for AudioScanner {
    fn discover(&self) -> Result<Vec<PathBuf>> {
        // A missing directory is an empty corpus, not a crash
        if !self.dir.exists() {
            tracing::warn!(
                "Audio directory '{}' does not exist — returning no files",
                self.dir.display()
            );
            return Ok(Vec::new());
        }

        let mut paths = find_files(&self.dir, &AUDIO_EXTENSIONS)?;
        for p in paths.iter_mut() {
            *p = p
                .canonicalize()
                .with_context(|| format!("Cannot resolve '{}'", p.display()))?;
        }
        paths.sort();

        tracing::info!(
            "Found {} audio files in '{}'",
            paths.len(),
            self.dir.display()
        );
        Ok(paths)
    }
}

/// Recursively collect files under `dir` whose extension matches one
/// of `extensions` (case-insensitive), sorted.
pub fn find_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Cannot walk directory '{}'", dir.display()))?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::scratch_dir;
    use std::fs;

    #[test]
    fn test_finds_nested_audio_sorted() {
        let dir = scratch_dir("scan");
        fs::create_dir_all(dir.join("spk2")).unwrap();
        fs::create_dir_all(dir.join("spk1")).unwrap();
        fs::write(dir.join("spk2/b.wav"), b"").unwrap();
        fs::write(dir.join("spk1/a.MP3"), b"").unwrap();
        fs::write(dir.join("spk1/notes.txt"), b"").unwrap();
        fs::write(dir.join("c.flac"), b"").unwrap();

        let found = AudioScanner::new(&dir).discover().unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.MP3", "b.wav"]);
        assert!(found.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir   = scratch_dir("scan-missing");
        let found = AudioScanner::new(dir.join("absent")).discover().unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(has_extension(Path::new("x/Y.WAV"), &AUDIO_EXTENSIONS));
        assert!(!has_extension(Path::new("x/y.wave"), &AUDIO_EXTENSIONS));
        assert!(!has_extension(Path::new("x/wav"), &AUDIO_EXTENSIONS));
    }
}
