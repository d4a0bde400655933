// ============================================================
// Layer 4 — Transcript Loader
// ============================================================
// Transcripts arrive in one of two layouts:
//
//   1. One file, one line per recording, naming the audio
//      relative to the audio directory:
//
//        spk1/utt_0001.wav<TAB>the quick brown fox
//        spk2/utt_0001.wav<TAB>jumps over the lazy dog
//
//   2. A directory of .txt files mirroring the audio tree,
//      where spk1/utt_0001.txt holds the transcript of
//      spk1/utt_0001.wav on its first line.
//
// Both are normalised to a table keyed by the relative path
// without its extension ("spk1/utt_0001"). Corpora reuse file
// names across speakers, so the directory part is part of the
// key, and a key that appears twice is an error rather than a
// silent overwrite.
//
// Reference: Rust Book §8 (Strings, Hash Maps)

use anyhow::{bail, Context, Result};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs,
    path::{Component, Path},
};

use crate::data::scanner::find_files;

/// Relative audio path (no extension) → transcript text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptTable {
    by_key: BTreeMap<String, String>,
}

impl TranscriptTable {
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Transcript for an audio file, given its path relative to the
    /// audio directory. Entries written as absolute paths are matched
    /// through `absolute`.
    pub fn lookup(&self, relative: &Path, absolute: &Path) -> Option<&str> {
        [relative, absolute]
            .into_iter()
            .filter_map(transcript_key)
            .find_map(|key| self.by_key.get(&key))
            .map(String::as_str)
    }

    fn insert(&mut self, key: String, sentence: String, origin: &str) -> Result<()> {
        match self.by_key.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(sentence);
                Ok(())
            }
            Entry::Occupied(slot) => {
                bail!("Duplicate transcript for '{}' ({})", slot.key(), origin)
            }
        }
    }
}

/// Load transcripts from a tab-separated file or a directory of .txt files.
pub fn load_transcripts(path: &Path) -> Result<TranscriptTable> {
    let table = if path.is_file() {
        load_tsv(path)?
    } else if path.is_dir() {
        load_txt_dir(path)?
    } else {
        bail!("Transcript path '{}' is neither a file nor a directory", path.display());
    };

    tracing::info!("Loaded {} transcripts from '{}'", table.len(), path.display());
    Ok(table)
}

/// Table key for a path: its components joined with '/', extension
/// dropped. `./spk1/utt.wav` and `spk1/utt.txt` both give `spk1/utt`.
pub fn transcript_key(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;

    let mut parts: Vec<&str> = Vec::new();
    if path.has_root() {
        parts.push("");
    }
    for component in path.parent().into_iter().flat_map(Path::components) {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::ParentDir => parts.push(".."),
            _ => {}
        }
    }
    parts.push(stem);

    Some(parts.join("/"))
}

fn load_tsv(path: &Path) -> Result<TranscriptTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read transcript file '{}'", path.display()))?;

    let mut table = TranscriptTable::default();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((audio, sentence)) = line.split_once('\t') else {
            tracing::warn!(
                "Skipping line {} of '{}': no tab separator",
                line_no + 1,
                path.display()
            );
            continue;
        };

        match transcript_key(Path::new(audio.trim())) {
            Some(key) => table.insert(
                key,
                sentence.trim().to_string(),
                &format!("line {} of '{}'", line_no + 1, path.display()),
            )?,
            None => tracing::warn!(
                "Skipping line {} of '{}': empty audio name",
                line_no + 1,
                path.display()
            ),
        }
    }
    Ok(table)
}

fn load_txt_dir(dir: &Path) -> Result<TranscriptTable> {
    let mut table = TranscriptTable::default();

    for txt in find_files(dir, &["txt"])? {
        let text = fs::read_to_string(&txt)
            .with_context(|| format!("Cannot read transcript '{}'", txt.display()))?;
        let first = text.lines().next().unwrap_or("").trim().to_string();

        let relative = txt.strip_prefix(dir).unwrap_or(&txt);
        if let Some(key) = transcript_key(relative) {
            table.insert(key, first, &format!("'{}'", txt.display()))?;
        }
    }
    Ok(table)
}
