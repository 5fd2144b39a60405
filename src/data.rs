//! Datasets consumed by the solvers
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{CoresetError, Result};

/// Access to the feature matrix and point weights of a dataset.
pub trait Dataset {
    /// Returns the feature matrix (one point per row).
    fn features(&self) -> ArrayView2<'_, f64>;
    /// Returns the weight of every point.
    fn weights(&self) -> ArrayView1<'_, f64>;

    /// Returns the number of points.
    fn len(&self) -> usize {
        self.features().nrows()
    }
    /// Checks whether the dataset holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_weights(weights: &Array1<f64>, n: usize) -> Result<()> {
    if weights.len() != n {
        return Err(CoresetError::ShapeMismatch(format!(
            "{} weights given for {} points",
            weights.len(),
            n
        )));
    }
    if weights.iter().any(|&w| !w.is_finite() || w < 0.0) {
        return Err(CoresetError::InvalidWeights(
            "weights must be finite and non-negative".to_string(),
        ));
    }
    Ok(())
}

/// An (optionally weighted) set of feature vectors
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Data {
    data: Array2<f64>,
    weights: Array1<f64>,
}

impl Data {
    /// Creates a uniformly weighted [`Data`] struct.
    pub fn new(data: Array2<f64>) -> Self {
        let n = data.nrows();
        Data {
            data,
            weights: Array1::ones(n),
        }
    }

    /// Sets the weights of the individual points.
    pub fn with_weights(mut self, weights: Array1<f64>) -> Result<Self> {
        check_weights(&weights, self.data.nrows())?;
        self.weights = weights;
        Ok(self)
    }

    /// Returns the `i`th point.
    pub fn point(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }
}

impl Dataset for Data {
    fn features(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
    fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }
}

/// A dataset of feature vectors paired with scalar responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupervisedData {
    data: Data,
    responses: Array1<f64>,
}

impl SupervisedData {
    /// Creates a [`SupervisedData`] struct.
    ///
    /// * `data`: feature matrix with one point per row
    /// * `responses`: response value of every point
    pub fn new(data: Array2<f64>, responses: Array1<f64>) -> Result<Self> {
        if data.nrows() != responses.len() {
            return Err(CoresetError::ShapeMismatch(format!(
                "{} responses given for {} points",
                responses.len(),
                data.nrows()
            )));
        }
        Ok(SupervisedData {
            data: Data::new(data),
            responses,
        })
    }

    /// Returns the response vector.
    pub fn responses(&self) -> ArrayView1<'_, f64> {
        self.responses.view()
    }
}

impl Dataset for SupervisedData {
    fn features(&self) -> ArrayView2<'_, f64> {
        self.data.features()
    }
    fn weights(&self) -> ArrayView1<'_, f64> {
        self.data.weights()
    }
}
