//! Coresubsets: weighted index subsets of a dataset
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::data::Dataset;
use crate::error::{CoresetError, Result};

/// An ordered selection of dataset indices with one weight per entry.
///
/// Entries with weight `0.0` are placeholders which have not been selected yet.
#[derive(Debug)]
pub struct Coresubset<'a, D: Dataset> {
    indices: Vec<usize>,
    weights: Array1<f64>,
    dataset: &'a D,
}

impl<D: Dataset> Clone for Coresubset<'_, D> {
    fn clone(&self) -> Self {
        Coresubset {
            indices: self.indices.clone(),
            weights: self.weights.clone(),
            dataset: self.dataset,
        }
    }
}

impl<'a, D: Dataset> Coresubset<'a, D> {
    /// Creates a [`Coresubset`] of `dataset` with unit weight on every index.
    pub fn new(indices: Vec<usize>, dataset: &'a D) -> Result<Self> {
        let weights = Array1::ones(indices.len());
        Self::with_weights(indices, weights, dataset)
    }

    /// Creates a [`Coresubset`] of `dataset` with the given entry weights.
    pub fn with_weights(indices: Vec<usize>, weights: Array1<f64>, dataset: &'a D) -> Result<Self> {
        let n = dataset.len();
        if indices.len() > n {
            return Err(CoresetError::Sizing {
                coreset_size: indices.len(),
                dataset_size: n,
            });
        }
        if weights.len() != indices.len() {
            return Err(CoresetError::ShapeMismatch(format!(
                "{} weights given for {} coreset indices",
                weights.len(),
                indices.len()
            )));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= n) {
            return Err(CoresetError::IndexOutOfBounds { index, len: n });
        }
        Ok(Coresubset {
            indices,
            weights,
            dataset,
        })
    }

    /// Creates a [`Coresubset`] of `size` zero-weighted placeholder entries pointing at `fill`.
    pub fn placeholder(fill: usize, size: usize, dataset: &'a D) -> Result<Self> {
        let n = dataset.len();
        if size > n {
            return Err(CoresetError::Sizing {
                coreset_size: size,
                dataset_size: n,
            });
        }
        if size > 0 && fill >= n {
            return Err(CoresetError::IndexOutOfBounds { index: fill, len: n });
        }
        Ok(Coresubset {
            indices: vec![fill; size],
            weights: Array1::zeros(size),
            dataset,
        })
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Checks whether the coresubset has no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the selected dataset indices.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the entry weights.
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Returns the dataset the indices refer to.
    pub fn dataset(&self) -> &'a D {
        self.dataset
    }

    /// Gathers the selected feature vectors into a matrix.
    pub fn points(&self) -> Array2<f64> {
        self.dataset.features().select(Axis(0), &self.indices)
    }

    /// Returns the indices of all entries carrying positive weight.
    pub fn selected(&self) -> Vec<usize> {
        self.indices
            .iter()
            .zip(self.weights.iter())
            .filter(|(_, &w)| w > 0.0)
            .map(|(&i, _)| i)
            .collect()
    }
}
