// ============================================================
// Layer 4 — Audio Batcher
// ============================================================
// Implements Burn's Batcher trait to turn one planned batch
// of decoded recordings into tensors.
//
// Recordings in a batch have different lengths, so each
// waveform is right-padded to the longest one:
//
//   Input:  N samples of lengths L1..LN
//   Output: waveforms [N, max(L)], lengths [N]
//
// Because the bucket sampler only puts recordings of similar
// duration together, max(L) stays close to every Li and
// little compute is wasted on padding.
//
// Reference: Burn Book §4 (Batcher)

use anyhow::{anyhow, Result};
use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    prelude::*,
    tensor::TensorData,
};

use crate::domain::audio_record::AudioSample;

// ─── AudioBatch ───────────────────────────────────────────────────────────────
/// A padded batch ready for a model forward pass.
#[derive(Debug, Clone)]
pub struct AudioBatch<B: Backend> {
    /// Padded waveforms — shape: [batch_size, max_frames]
    pub waveforms: Tensor<B, 2>,

    /// Unpadded frame count per row — shape: [batch_size]
    pub lengths: Tensor<B, 1, Int>,

    /// Transcripts in batch order
    pub sentences: Vec<String>,
}

// ─── AudioBatcher ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct AudioBatcher {
    /// Value written into padded positions
    pad_value: f32,
}

impl AudioBatcher {
    pub fn new(pad_value: f32) -> Self {
        Self { pad_value }
    }
}

impl Default for AudioBatcher {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<B: Backend> Batcher<B, AudioSample, AudioBatch<B>> for AudioBatcher {
    fn batch(&self, items: Vec<AudioSample>, device: &B::Device) -> AudioBatch<B> {
        let batch_size = items.len();
        let max_frames = items.iter().map(AudioSample::num_frames).max().unwrap_or(0);

        let mut flat      = Vec::with_capacity(batch_size * max_frames);
        let mut lengths   = Vec::with_capacity(batch_size);
        let mut sentences = Vec::with_capacity(batch_size);

        for item in items {
            let frames = item.num_frames();
            flat.extend_from_slice(&item.samples);
            flat.resize(flat.len() + (max_frames - frames), self.pad_value);
            lengths.push(frames as i64);
            sentences.push(item.record.sentence);
        }

        let waveforms = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, max_frames]),
            device,
        );
        let lengths = Tensor::<B, 1, Int>::from_data(
            TensorData::new(lengths, [batch_size]),
            device,
        );

        AudioBatch { waveforms, lengths, sentences }
    }
}

/// Fetch the samples named by a planned batch, in order.
pub fn fetch_batch<D>(dataset: &D, indices: &[usize]) -> Result<Vec<AudioSample>>
where
    D: Dataset<AudioSample> + ?Sized,
{
    indices
        .iter()
        .map(|&i| {
            dataset
                .get(i)
                .ok_or_else(|| anyhow!("Planned index {} is outside the dataset ({} items)", i, dataset.len()))
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::AudioDataset;
    use crate::domain::audio_record::AudioRecord;

    type TestBackend = burn::backend::NdArray;

    fn sample(name: &str, wave: Vec<f32>) -> AudioSample {
        AudioSample {
            record:        AudioRecord::new(format!("/{name}.wav"), name, wave.len() as f64),
            samples:       wave,
            sampling_rate: 1,
        }
    }

    #[test]
    fn test_pads_to_longest() {
        let device = Default::default();
        let items  = vec![
            sample("short", vec![1.0, 2.0]),
            sample("long", vec![3.0, 4.0, 5.0, 6.0]),
        ];

        let batch: AudioBatch<TestBackend> = AudioBatcher::new(-1.0).batch(items, &device);

        assert_eq!(batch.waveforms.dims(), [2, 4]);
        let wave: Vec<f32> = batch.waveforms.into_data().convert::<f32>().to_vec().unwrap();
        assert_eq!(wave, vec![1.0, 2.0, -1.0, -1.0, 3.0, 4.0, 5.0, 6.0]);

        let lengths: Vec<i64> = batch.lengths.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(lengths, vec![2, 4]);
        assert_eq!(batch.sentences, vec!["short", "long"]);
    }

    #[test]
    fn test_fetch_batch_keeps_order() {
        let ds = AudioDataset::new(vec![
            sample("a", vec![0.0]),
            sample("b", vec![0.0]),
            sample("c", vec![0.0]),
        ]);
        let got = fetch_batch(&ds, &[2, 0]).unwrap();
        let names: Vec<_> = got.iter().map(|s| s.record.sentence.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[test]
    fn test_fetch_batch_rejects_bad_index() {
        let ds  = AudioDataset::new(vec![sample("a", vec![0.0])]);
        let err = fetch_batch(&ds, &[0, 5]).unwrap_err();
        assert!(err.to_string().contains("Planned index 5"));
    }
}
