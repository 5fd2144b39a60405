//! Uniform or weighted random subsampling
use log::debug;

use super::Solver;
use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::Result;
use crate::random::{sample_indices, RandomKey};

/// Reduces a dataset by drawing a fixed number of points at random
#[derive(Clone, Debug)]
pub struct RandomSample {
    /// Number of points in the coresubset
    pub coreset_size: usize,
    /// Key for random number generation
    pub random_key: RandomKey,
    /// Whether the dataset weights are used as selection probabilities
    pub weighted: bool,
    /// Whether to sample without replacement
    pub unique: bool,
}

impl RandomSample {
    /// Creates a [`RandomSample`] solver drawing uniformly without replacement.
    pub fn new(coreset_size: usize, random_key: RandomKey) -> Self {
        RandomSample {
            coreset_size,
            random_key,
            weighted: false,
            unique: true,
        }
    }

    /// Sets whether the dataset weights are used as selection probabilities.
    pub fn with_weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Sets whether indices must be unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

impl<D: Dataset> Solver<D> for RandomSample {
    type State = ();

    fn reduce<'a>(&self, dataset: &'a D, _state: Option<()>) -> Result<(Coresubset<'a, D>, ())> {
        let weights = dataset.weights().to_vec();
        let selection_weights = if self.weighted {
            Some(weights.as_slice())
        } else {
            None
        };
        let indices = sample_indices(
            self.random_key,
            dataset.len(),
            self.coreset_size,
            selection_weights,
            !self.unique,
        )?;
        debug!("sampled {} of {} points", indices.len(), dataset.len());
        Ok((Coresubset::new(indices, dataset)?, ()))
    }
}
