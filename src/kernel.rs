//! Kernel functions and derived matrices
pub mod cached;
pub use cached::CachedKernel;
pub mod gaussian;
pub use gaussian::SquaredExponentialKernel;
pub mod pcimq;
pub use pcimq::PCIMQKernel;
pub mod precomputed;
pub use precomputed::PrecomputedGramian;
pub mod stein;
pub use stein::SteinKernel;

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Computes the squared Euclidean distance of two points.
pub fn squared_distance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .fold(0.0, |acc, (xk, yk)| acc + (xk - yk).powi(2))
}

/// Computes the median heuristic for the length scale of a kernel.
///
/// Returns `sqrt(median / 2)` where the median is taken over the squared distances of all
/// distinct pairs of rows of `x`.
pub fn median_heuristic(x: ArrayView2<f64>) -> f64 {
    let n = x.nrows();
    let mut dists = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            dists.push(squared_distance(x.row(i), x.row(j)));
        }
    }
    if dists.is_empty() {
        return 0.0;
    }
    dists.sort_by(|a, b| a.total_cmp(b));
    let m = dists.len();
    let median = if m % 2 == 1 {
        dists[m / 2]
    } else {
        0.5 * (dists[m / 2 - 1] + dists[m / 2])
    };
    (median / 2.0).sqrt()
}

fn weight_or_one(weights: Option<ArrayView1<f64>>, i: usize) -> f64 {
    match weights {
        Some(w) => w[i],
        None => 1.0,
    }
}

/// A positive semi-definite kernel function on feature vectors
pub trait Kernel {
    /// Evaluates the kernel for one pair of points.
    fn compute_elementwise(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;

    /// Returns the length scale of the kernel if it has one.
    fn length_scale(&self) -> Option<f64> {
        None
    }

    /// Computes the matrix of kernel values between the rows of `x` and `y`.
    fn compute(&self, x: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64> {
        let mut k = Array2::zeros((x.nrows(), y.nrows()));
        for (mut ki, xi) in k.outer_iter_mut().zip(x.outer_iter()) {
            for (kij, yj) in ki.iter_mut().zip(y.outer_iter()) {
                *kij = self.compute_elementwise(xi, yj);
            }
        }
        k
    }

    /// Fills `ki` with the kernel values between every row of `x` and the point `y`.
    fn compute_row(&self, x: ArrayView2<f64>, y: ArrayView1<f64>, ki: &mut [f64]) {
        for (kij, xj) in ki.iter_mut().zip(x.outer_iter()) {
            *kij = self.compute_elementwise(xj, y);
        }
    }

    /// Computes the kernel value of every row of `x` with itself.
    fn diagonal(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.outer_iter()
            .map(|xi| self.compute_elementwise(xi, xi))
            .collect()
    }

    /// Computes the weighted mean of the kernel matrix between `x` and `y` along `axis`.
    ///
    /// With `Axis(1)` the result holds, for every row of `x`, the mean kernel value against
    /// all rows of `y`; with `Axis(0)` the roles are swapped. The matrix is evaluated in
    /// blocks of at most `block_size` rows and columns, which bounds the memory footprint
    /// without changing the result. If the weights along `axis` sum to zero the mean is zero.
    fn compute_mean(
        &self,
        x: ArrayView2<f64>,
        x_weights: Option<ArrayView1<f64>>,
        y: ArrayView2<f64>,
        y_weights: Option<ArrayView1<f64>>,
        axis: Axis,
        block_size: Option<usize>,
    ) -> Array1<f64> {
        let (nx, ny) = (x.nrows(), y.nrows());
        let bx = block_size.unwrap_or(nx).max(1);
        let by = block_size.unwrap_or(ny).max(1);
        let mut sums = Array1::<f64>::zeros(if axis == Axis(1) { nx } else { ny });
        for start_x in (0..nx).step_by(bx) {
            let end_x = usize::min(start_x + bx, nx);
            for start_y in (0..ny).step_by(by) {
                let end_y = usize::min(start_y + by, ny);
                let block = self.compute(
                    x.slice(s![start_x..end_x, ..]),
                    y.slice(s![start_y..end_y, ..]),
                );
                for ((bi, bj), &kij) in block.indexed_iter() {
                    let (i, j) = (start_x + bi, start_y + bj);
                    if axis == Axis(1) {
                        sums[i] += weight_or_one(y_weights, j) * kij;
                    } else {
                        sums[j] += weight_or_one(x_weights, i) * kij;
                    }
                }
            }
        }
        let total: f64 = if axis == Axis(1) {
            y_weights.map_or(ny as f64, |w| w.sum())
        } else {
            x_weights.map_or(nx as f64, |w| w.sum())
        };
        if total > 0.0 {
            sums / total
        } else {
            sums.fill(0.0);
            sums
        }
    }

    /// Computes the mean kernel value of every row of `x` against all rows of `x`.
    ///
    /// The mean over the second argument is weighted by `weights` (uniform if `None`).
    fn gramian_row_mean(
        &self,
        x: ArrayView2<f64>,
        weights: Option<ArrayView1<f64>>,
        block_size: Option<usize>,
    ) -> Array1<f64> {
        self.compute_mean(x, None, x, weights, Axis(1), block_size)
    }
}

/// A kernel whose derivatives are available in closed form
pub trait DifferentiableKernel: Kernel {
    /// Computes the gradient with respect to the first argument.
    fn grad_x(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64>;
    /// Computes the gradient with respect to the second argument.
    fn grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64>;
    /// Computes the divergence (with respect to `x`) of the gradient with respect to `y`.
    fn divergence_x_grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;
}

impl<K: Kernel + ?Sized> Kernel for &K {
    fn compute_elementwise(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (**self).compute_elementwise(x, y)
    }
    fn compute_row(&self, x: ArrayView2<f64>, y: ArrayView1<f64>, ki: &mut [f64]) {
        (**self).compute_row(x, y, ki)
    }
    fn diagonal(&self, x: ArrayView2<f64>) -> Array1<f64> {
        (**self).diagonal(x)
    }
    fn length_scale(&self) -> Option<f64> {
        (**self).length_scale()
    }
}

impl<K: DifferentiableKernel + ?Sized> DifferentiableKernel for &K {
    fn grad_x(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        (**self).grad_x(x, y)
    }
    fn grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        (**self).grad_y(x, y)
    }
    fn divergence_x_grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (**self).divergence_x_grad_y(x, y)
    }
}
