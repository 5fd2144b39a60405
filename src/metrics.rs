//! Quality metrics of coresubsets
use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::{CoresetError, Result};
use crate::kernel::Kernel;

/// Maximum mean discrepancy between two weighted point sets.
///
/// `MMD² = E k(x, x') + E k(y, y') - 2 E k(x, y)`, expectations taken with respect to the
/// normalised weights of the respective sets.
pub struct MMD<K: Kernel> {
    /// Kernel embedding the point sets
    pub kernel: K,
    /// Block size of the kernel mean computations (`None` for a single block)
    pub block_size: Option<usize>,
}

impl<K: Kernel> MMD<K> {
    /// Creates an [`MMD`] metric.
    pub fn new(kernel: K) -> Self {
        MMD {
            kernel,
            block_size: None,
        }
    }

    /// Sets the block size of the kernel mean computations.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    fn mean(
        &self,
        x: ArrayView2<f64>,
        x_weights: ArrayView1<f64>,
        y: ArrayView2<f64>,
        y_weights: ArrayView1<f64>,
    ) -> f64 {
        let row_means = self.kernel.compute_mean(
            x,
            Some(x_weights),
            y,
            Some(y_weights),
            Axis(1),
            self.block_size,
        );
        let total = x_weights.sum();
        if total > 0.0 {
            row_means.dot(&x_weights) / total
        } else {
            0.0
        }
    }

    /// Computes the discrepancy between two weighted point sets.
    pub fn compute(
        &self,
        x: ArrayView2<f64>,
        x_weights: ArrayView1<f64>,
        y: ArrayView2<f64>,
        y_weights: ArrayView1<f64>,
    ) -> Result<f64> {
        if x.ncols() != y.ncols() {
            return Err(CoresetError::ShapeMismatch(format!(
                "cannot compare points of dimension {} and {}",
                x.ncols(),
                y.ncols()
            )));
        }
        if x_weights.len() != x.nrows() || y_weights.len() != y.nrows() {
            return Err(CoresetError::ShapeMismatch(
                "one weight per point required".to_string(),
            ));
        }
        let kxx = self.mean(x, x_weights, x, x_weights);
        let kyy = self.mean(y, y_weights, y, y_weights);
        let kxy = self.mean(x, x_weights, y, y_weights);
        // round-off may push the square slightly below zero
        Ok((kxx + kyy - 2.0 * kxy).max(0.0).sqrt())
    }

    /// Computes the discrepancy between a coresubset and its dataset.
    ///
    /// Entry weights of the coresubset are multiplied by the weights of the selected points.
    pub fn compute_coresubset<D: Dataset>(&self, coresubset: &Coresubset<'_, D>) -> Result<f64> {
        let dataset = coresubset.dataset();
        let point_weights = dataset.weights();
        let coreset_weights = coresubset
            .indices()
            .iter()
            .zip(coresubset.weights().iter())
            .map(|(&idx, &w)| w * point_weights[idx])
            .collect::<ndarray::Array1<f64>>();
        let points = coresubset.points();
        self.compute(
            dataset.features(),
            point_weights,
            points.view(),
            coreset_weights.view(),
        )
    }
}
