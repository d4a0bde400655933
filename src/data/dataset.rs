use anyhow::{Context, Result};
use burn::data::dataset::Dataset;

use crate::data::audio_io::decode_mono;
use crate::domain::audio_record::{AudioRecord, AudioSample};

/// Every record of a manifest with its waveform held in memory.
pub struct AudioDataset {
    samples: Vec<AudioSample>,
}

impl AudioDataset {
    pub fn new(samples: Vec<AudioSample>) -> Self {
        Self { samples }
    }

    /// Decode each record's audio. Fails on the first unreadable file.
    pub fn load(records: Vec<AudioRecord>) -> Result<Self> {
        let mut samples = Vec::with_capacity(records.len());

        for record in records {
            let (wave, sampling_rate) = decode_mono(&record.path)
                .with_context(|| format!("Cannot load '{}'", record.path.display()))?;
            samples.push(AudioSample { record, samples: wave, sampling_rate });
        }

        let total: usize = samples.iter().map(AudioSample::num_frames).sum();
        tracing::info!("Decoded {} recordings ({} frames)", samples.len(), total);
        Ok(Self { samples })
    }
}

impl Dataset<AudioSample> for AudioDataset {
    fn get(&self, index: usize) -> Option<AudioSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{scratch_dir, write_wav};

    #[test]
    fn test_load_decodes_every_record() {
        let dir = scratch_dir("dataset");
        let a   = dir.join("a.wav");
        let b   = dir.join("b.wav");
        write_wav(&a, 16_000, 1, 160, 100);
        write_wav(&b, 16_000, 1, 320, 100);

        let ds = AudioDataset::load(vec![
            AudioRecord::new(&a, "first", 0.01),
            AudioRecord::new(&b, "second", 0.02),
        ])
        .unwrap();

        assert_eq!(ds.len(), 2);
        let second = ds.get(1).unwrap();
        assert_eq!(second.num_frames(), 320);
        assert_eq!(second.sampling_rate, 16_000);
        assert_eq!(second.record.sentence, "second");
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_load_fails_on_missing_audio() {
        let dir = scratch_dir("dataset-missing");
        let err = AudioDataset::load(vec![AudioRecord::new(dir.join("gone.wav"), "x", 1.0)])
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("gone.wav"));
    }
}
