//! Seeded random keys and index sampling
use ndarray::Array2;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::error::{CoresetError, Result};

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// A reproducible source of randomness.
///
/// Keys are never advanced in place: derived keys are obtained with [`RandomKey::fold_in`]
/// and [`RandomKey::split`], so replaying with the same key reproduces every draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomKey(u64);

impl RandomKey {
    /// Creates a key from a seed.
    pub fn new(seed: u64) -> Self {
        RandomKey(seed)
    }

    /// Derives the key belonging to step `data` of an iteration.
    pub fn fold_in(&self, data: u64) -> Self {
        RandomKey(splitmix64(self.0 ^ splitmix64(data)))
    }

    /// Derives `num` independent keys.
    pub fn split(&self, num: usize) -> Vec<Self> {
        let base = RandomKey(splitmix64(!self.0));
        (0..num).map(|i| base.fold_in(i as u64)).collect()
    }

    /// Creates a generator seeded by this key.
    pub fn rng(&self) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(self.0)
    }
}

/// Draws one index with probability proportional to `weights`.
pub fn choice_weighted<'w, R, I>(rng: &mut R, weights: I) -> Result<usize>
where
    R: Rng,
    I: IntoIterator<Item = &'w f64>,
{
    let dist = WeightedIndex::new(weights).map_err(|err| CoresetError::Sampling(err.to_string()))?;
    Ok(dist.sample(rng))
}

/// Draws `size` indices out of `0..n`.
///
/// * `weights`: selection probabilities (up to normalisation), uniform if `None`
/// * `replace`: whether an index may be drawn more than once
pub fn sample_indices(
    key: RandomKey,
    n: usize,
    size: usize,
    weights: Option<&[f64]>,
    replace: bool,
) -> Result<Vec<usize>> {
    if !replace && size > n {
        return Err(CoresetError::Sizing {
            coreset_size: size,
            dataset_size: n,
        });
    }
    if size == 0 {
        return Ok(Vec::new());
    }
    let mut rng = key.rng();
    match (weights, replace) {
        (None, false) => Ok(rand::seq::index::sample(&mut rng, n, size).into_vec()),
        (None, true) => Ok((0..size).map(|_| rng.gen_range(0..n)).collect()),
        (Some(w), true) => {
            let dist =
                WeightedIndex::new(w).map_err(|err| CoresetError::Sampling(err.to_string()))?;
            Ok((0..size).map(|_| dist.sample(&mut rng)).collect())
        }
        (Some(w), false) => {
            if w.iter().filter(|&&wi| wi > 0.0).count() < size {
                return Err(CoresetError::Sampling(format!(
                    "cannot draw {size} distinct indices from fewer positive weights"
                )));
            }
            let mut remaining = w.to_vec();
            let mut drawn = Vec::with_capacity(size);
            for _ in 0..size {
                let idx = choice_weighted(&mut rng, remaining.iter())?;
                remaining[idx] = 0.0;
                drawn.push(idx);
            }
            Ok(drawn)
        }
    }
}

/// Samples a `num_batches x batch_size` table of indices below `max_index`.
///
/// Each row holds distinct indices.
pub fn sample_batch_indices(
    key: RandomKey,
    max_index: usize,
    batch_size: usize,
    num_batches: usize,
) -> Result<Array2<usize>> {
    if max_index < batch_size {
        return Err(CoresetError::InvalidParameter(
            "'max_index' must be greater than or equal to 'batch_size'".to_string(),
        ));
    }
    let mut batches = Array2::zeros((num_batches, batch_size));
    for (mut row, batch_key) in batches.outer_iter_mut().zip(key.split(num_batches)) {
        let mut permutation: Vec<usize> = (0..max_index).collect();
        permutation.shuffle(&mut batch_key.rng());
        for (slot, &idx) in row.iter_mut().zip(permutation.iter()) {
            *slot = idx;
        }
    }
    Ok(batches)
}
