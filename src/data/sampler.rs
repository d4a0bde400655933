// ============================================================
// Layer 4 — Bucketing Batch Sampler
// ============================================================
// Groups items of similar duration into the same batch and
// sizes each batch by its bucket, so that a batch of short
// clips holds many items and a batch of long clips holds few.
// Compute per step stays roughly balanced across durations.
//
// One epoch is planned like this:
//
//   (index, duration) table
//       │  shuffle                    ← fresh permutation
//       ▼
//   bucket lists    [0: 7 2 9 ...] [1: 4 0 ...] ...
//       │  chunk by bucket batch size
//       ▼
//   batches         [7 2] [9 ..] [4 0] ...
//       │  shuffle batch order        ← second, independent shuffle
//       ▼
//   epoch plan
//
// The duration table is read once from the dataset and never
// changes. The only mutable state is the sampler's own seeded
// RNG, so two samplers built with the same seed produce the
// same sequence of epochs.
//
// Reference: rand crate documentation (SliceRandom, StdRng)
//            Burn Book §4 (Datasets)

use burn::data::dataset::Dataset;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::buckets::{BucketConfig, BucketError};
use crate::domain::traits::HasDuration;

/// Derive the seed for one data-loading worker.
///
/// Worker 0 keeps the base seed, so single-worker runs are
/// reproducible with the seed the user passed in.
pub fn worker_seed(base_seed: u64, worker_id: usize) -> u64 {
    base_seed ^ (worker_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

// ─── PlannedBatch ─────────────────────────────────────────────────────────────
/// One batch of an epoch plan: the bucket it was drawn from and
/// the item indices in it, in shuffled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedBatch {
    pub bucket:  usize,
    pub indices: Vec<usize>,
}

impl PlannedBatch {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ─── BucketSampler ────────────────────────────────────────────────────────────
pub struct BucketSampler {
    buckets:      BucketConfig,
    idx2duration: Vec<(usize, f64)>,
    rng:          StdRng,
}

impl BucketSampler {
    /// Scan `dataset` once and capture every item's duration.
    pub fn from_dataset<D, I>(
        dataset: &D,
        buckets: BucketConfig,
        seed:    u64,
    ) -> Result<Self, BucketError>
    where
        D: Dataset<I> + ?Sized,
        I: HasDuration,
    {
        let mut durations = Vec::with_capacity(dataset.len());
        for index in 0..dataset.len() {
            let item = dataset
                .get(index)
                .ok_or(BucketError::MissingItem { index })?;
            durations.push(item.duration());
        }
        Self::from_durations(durations, buckets, seed)
    }

    /// Build from durations directly; an item's index is its position.
    pub fn from_durations<T: HasDuration>(
        items:   impl IntoIterator<Item = T>,
        buckets: BucketConfig,
        seed:    u64,
    ) -> Result<Self, BucketError> {
        let mut idx2duration = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let duration = item.duration();
            if duration.is_nan() {
                return Err(BucketError::InvalidDuration { index, duration });
            }
            idx2duration.push((index, duration));
        }

        tracing::debug!(
            "Bucket sampler over {} items, {} buckets, seed {}",
            idx2duration.len(),
            buckets.num_buckets(),
            seed,
        );

        Ok(Self {
            buckets,
            idx2duration,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn buckets(&self) -> &BucketConfig {
        &self.buckets
    }

    /// Number of items in the duration table.
    ///
    /// This is an item count, not a batch count; see `num_batches`.
    pub fn len(&self) -> usize {
        self.idx2duration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx2duration.is_empty()
    }

    /// How many items fall into each bucket.
    pub fn bucket_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.buckets.num_buckets()];
        for &(_, duration) in &self.idx2duration {
            counts[self.buckets.classify(duration)] += 1;
        }
        counts
    }

    /// Exact number of batches every epoch will contain.
    pub fn num_batches(&self) -> usize {
        self.bucket_counts()
            .iter()
            .enumerate()
            .map(|(bucket, &count)| count.div_ceil(self.buckets.batch_size(bucket)))
            .sum()
    }

    /// Plan one epoch with the sampler's own RNG.
    pub fn plan_epoch(&mut self) -> Vec<PlannedBatch> {
        let Self { buckets, idx2duration, rng } = self;
        plan_batches(buckets, idx2duration, rng)
    }

    /// Plan one epoch drawing all randomness from `rng`.
    pub fn plan_epoch_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PlannedBatch> {
        plan_batches(&self.buckets, &self.idx2duration, rng)
    }

    /// Start a new pass: plans a fresh epoch and yields its batches.
    pub fn iter(&mut self) -> std::vec::IntoIter<PlannedBatch> {
        self.plan_epoch().into_iter()
    }
}

impl<'a> IntoIterator for &'a mut BucketSampler {
    type Item     = PlannedBatch;
    type IntoIter = std::vec::IntoIter<PlannedBatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn plan_batches<R: Rng + ?Sized>(
    buckets:      &BucketConfig,
    idx2duration: &[(usize, f64)],
    rng:          &mut R,
) -> Vec<PlannedBatch> {
    let mut order = idx2duration.to_vec();
    order.shuffle(rng);

    // Relative order inside a bucket is the shuffled order
    let mut per_bucket: Vec<Vec<usize>> = vec![Vec::new(); buckets.num_buckets()];
    for (index, duration) in order {
        per_bucket[buckets.classify(duration)].push(index);
    }

    let mut batches = Vec::new();
    for (bucket, indices) in per_bucket.into_iter().enumerate() {
        let size = buckets.batch_size(bucket);
        batches.extend(indices.chunks(size).map(|chunk| PlannedBatch {
            bucket,
            indices: chunk.to_vec(),
        }));
    }

    batches.shuffle(rng);
    batches
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::InMemDataset;
    use std::collections::{BTreeMap, BTreeSet};

    use crate::domain::audio_record::AudioRecord;

    fn random_durations(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(0.0..32.0)).collect()
    }

    fn default_sampler(durations: &[f64], seed: u64) -> BucketSampler {
        BucketSampler::from_durations(durations.to_vec(), BucketConfig::default(), seed).unwrap()
    }

    /// index → bucket for every batch of a plan
    fn membership(plan: &[PlannedBatch]) -> BTreeMap<usize, usize> {
        plan.iter()
            .flat_map(|b| b.indices.iter().map(move |&i| (i, b.bucket)))
            .collect()
    }

    #[test]
    fn test_small_example_plan() {
        let cfg     = BucketConfig::new(vec![5.0, 10.0], vec![2, 2, 1]).unwrap();
        let mut s   = BucketSampler::from_durations(vec![3.0, 4.0, 6.0, 12.0], cfg, 7).unwrap();
        let mut plan = s.plan_epoch();
        plan.sort_by_key(|b| b.bucket);

        assert_eq!(plan.len(), 3);
        let mut first = plan[0].indices.clone();
        first.sort();
        assert_eq!((plan[0].bucket, first), (0, vec![0, 1]));
        assert_eq!(plan[1], PlannedBatch { bucket: 1, indices: vec![2] });
        assert_eq!(plan[2], PlannedBatch { bucket: 2, indices: vec![3] });
    }

    #[test]
    fn test_every_item_exactly_once_per_epoch() {
        let durations = random_durations(500, 1);
        let mut s     = default_sampler(&durations, 42);

        for _ in 0..5 {
            let plan: Vec<usize> = s.plan_epoch().into_iter().flat_map(|b| b.indices).collect();
            assert_eq!(plan.len(), durations.len());
            let unique: BTreeSet<usize> = plan.iter().copied().collect();
            assert_eq!(unique.len(), durations.len());
            let expected: BTreeSet<usize> = (0..durations.len()).collect();
            assert_eq!(unique, expected);
        }
    }

    #[test]
    fn test_batches_respect_size_and_interval() {
        let durations = random_durations(300, 2);
        let mut s     = default_sampler(&durations, 3);
        let cfg       = s.buckets().clone();

        for batch in s.plan_epoch() {
            assert!(!batch.is_empty());
            assert!(batch.len() <= cfg.batch_size(batch.bucket));
            let (lower, upper) = cfg.interval(batch.bucket);
            for &i in &batch.indices {
                assert!(lower < durations[i] && durations[i] <= upper);
            }
        }
    }

    #[test]
    fn test_only_last_chunk_of_a_bucket_is_short() {
        let durations = random_durations(300, 4);
        let mut s     = default_sampler(&durations, 5);
        let counts    = s.bucket_counts();
        let cfg       = s.buckets().clone();

        let mut short_per_bucket = vec![0usize; cfg.num_buckets()];
        for batch in s.plan_epoch() {
            if batch.len() < cfg.batch_size(batch.bucket) {
                short_per_bucket[batch.bucket] += 1;
            }
        }
        for (bucket, &short) in short_per_bucket.iter().enumerate() {
            let expected = usize::from(counts[bucket] % cfg.batch_size(bucket) != 0);
            assert_eq!(short, expected, "bucket {bucket}");
        }
    }

    #[test]
    fn test_same_seed_same_epochs() {
        let durations = random_durations(200, 6);
        let mut a     = default_sampler(&durations, 11);
        let mut b     = default_sampler(&durations, 11);
        for _ in 0..3 {
            assert_eq!(a.plan_epoch(), b.plan_epoch());
        }
    }

    #[test]
    fn test_different_seeds_change_order_not_membership() {
        let durations = random_durations(200, 7);
        let plan_a    = default_sampler(&durations, 1).plan_epoch();
        let plan_b    = default_sampler(&durations, 2).plan_epoch();

        assert_ne!(plan_a, plan_b);
        assert_eq!(membership(&plan_a), membership(&plan_b));
    }

    #[test]
    fn test_successive_epochs_are_reshuffled() {
        let durations = random_durations(200, 8);
        let mut s     = default_sampler(&durations, 9);
        let first     = s.plan_epoch();
        let second    = s.plan_epoch();
        assert_ne!(first, second);
        assert_eq!(membership(&first), membership(&second));
    }

    #[test]
    fn test_iter_restarts_each_pass() {
        let durations = random_durations(100, 10);
        let mut s     = default_sampler(&durations, 12);
        let expected  = s.num_batches();

        for _ in 0..2 {
            let mut seen  = 0usize;
            let mut count = 0usize;
            for batch in &mut s {
                seen  += batch.len();
                count += 1;
            }
            assert_eq!(seen, durations.len());
            assert_eq!(count, expected);
        }
    }

    #[test]
    fn test_len_is_item_count_not_batch_count() {
        let durations = vec![1.0; 130];
        let s         = default_sampler(&durations, 0);
        assert_eq!(s.len(), 130);
        // 130 short clips in batches of 64 → 3 batches
        assert_eq!(s.num_batches(), 3);

        let tiny = BucketSampler::from_durations(
            durations.clone(),
            BucketConfig::new(Vec::new(), vec![1000]).unwrap(),
            0,
        )
        .unwrap();
        assert_eq!(tiny.len(), 130);
        assert_eq!(tiny.num_batches(), 1);
    }

    #[test]
    fn test_empty_table_plans_nothing() {
        let mut s = default_sampler(&[], 0);
        assert!(s.is_empty());
        assert!(s.plan_epoch().is_empty());
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn test_from_dataset_reads_durations() {
        let records = vec![
            AudioRecord::new("/a.wav", "a", 2.0),
            AudioRecord::new("/b.wav", "b", 7.5),
            AudioRecord::new("/c.wav", "c", 40.0),
        ];
        let dataset = InMemDataset::new(records);
        let s = BucketSampler::from_dataset(&dataset, BucketConfig::default(), 0).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.bucket_counts(), vec![1, 1, 0, 0, 0, 1]);
    }

    struct HoleyDataset;

    impl Dataset<f64> for HoleyDataset {
        fn get(&self, index: usize) -> Option<f64> {
            if index == 2 { None } else { Some(1.0) }
        }

        fn len(&self) -> usize {
            4
        }
    }

    #[test]
    fn test_missing_item_is_reported() {
        let err = BucketSampler::from_dataset(&HoleyDataset, BucketConfig::default(), 0)
            .err()
            .unwrap();
        assert_eq!(err, BucketError::MissingItem { index: 2 });
    }

    #[test]
    fn test_nan_duration_is_rejected() {
        let err = BucketSampler::from_durations(vec![1.0, f64::NAN], BucketConfig::default(), 0)
            .err()
            .unwrap();
        assert!(matches!(err, BucketError::InvalidDuration { index: 1, .. }));
    }

    #[test]
    fn test_worker_seeds_differ() {
        assert_eq!(worker_seed(42, 0), 42);
        let seeds: BTreeSet<u64> = (0..8).map(|w| worker_seed(42, w)).collect();
        assert_eq!(seeds.len(), 8);
    }
}
