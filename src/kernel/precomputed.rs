use super::Kernel;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// A precomputed kernel matrix padded with one all-zero row and column.
///
/// The extra position `n` acts as an empty slot: gathering it yields zero kernel values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrecomputedGramian {
    n: usize,
    kernel_matrix: Array2<f64>,
}

impl PrecomputedGramian {
    /// Precomputes the padded kernel matrix of `base` over the rows of `x`.
    pub fn from(base: &impl Kernel, x: ArrayView2<f64>) -> Self {
        let n = x.nrows();
        let mut kernel_matrix = Array2::zeros((n + 1, n + 1));
        for i in 0..n {
            for j in 0..=i {
                let kij = base.compute_elementwise(x.row(i), x.row(j));
                kernel_matrix[(i, j)] = kij;
                kernel_matrix[(j, i)] = kij;
            }
        }
        PrecomputedGramian { n, kernel_matrix }
    }

    /// Returns the number of points (excluding the padding).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Checks whether the padded matrix belongs to a set of `n` points.
    pub fn covers(&self, n: usize) -> bool {
        self.n == n && self.kernel_matrix.dim() == (n + 1, n + 1)
    }

    /// Returns the index of the zero padding.
    pub fn sentinel(&self) -> usize {
        self.n
    }

    /// Returns the kernel value of points `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.kernel_matrix[(i, j)]
    }

    /// Returns the padded matrix.
    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.kernel_matrix.view()
    }
}
