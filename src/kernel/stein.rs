//! Stein kernel induced by a base kernel and a score function
use super::{DifferentiableKernel, Kernel};
use crate::score_matching::ScoreFunction;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// The Stein kernel
/// `k_p(x, y) = ∇ₓ·∇ᵧk(x, y) + ⟨∇ₓk(x, y), s(y)⟩ + ⟨∇ᵧk(x, y), s(x)⟩ + k(x, y)⟨s(x), s(y)⟩`
/// where `s` is the score function of the target distribution.
///
/// Every evaluation calls the score function; wrap expensive estimates in a
/// [`CachedScore`](crate::score_matching::CachedScore) over the points of interest.
pub struct SteinKernel<K, S>
where
    K: DifferentiableKernel,
    S: ScoreFunction,
{
    base_kernel: K,
    score_function: S,
}

impl<K, S> SteinKernel<K, S>
where
    K: DifferentiableKernel,
    S: ScoreFunction,
{
    /// Creates a [`SteinKernel`] struct.
    pub fn new(base_kernel: K, score_function: S) -> Self {
        SteinKernel {
            base_kernel,
            score_function,
        }
    }

    /// Returns the base kernel.
    pub fn base_kernel(&self) -> &K {
        &self.base_kernel
    }

    /// Returns the score function.
    pub fn score_function(&self) -> &S {
        &self.score_function
    }

    fn evaluate(
        &self,
        x: ArrayView1<f64>,
        y: ArrayView1<f64>,
        sx: &Array1<f64>,
        sy: &Array1<f64>,
    ) -> f64 {
        let k = &self.base_kernel;
        k.divergence_x_grad_y(x, y)
            + k.grad_x(x, y).dot(sy)
            + k.grad_y(x, y).dot(sx)
            + k.compute_elementwise(x, y) * sx.dot(sy)
    }
}

impl<K, S> Kernel for SteinKernel<K, S>
where
    K: DifferentiableKernel,
    S: ScoreFunction,
{
    fn compute_elementwise(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let sx = self.score_function.score(x);
        let sy = self.score_function.score(y);
        self.evaluate(x, y, &sx, &sy)
    }

    fn compute_row(&self, x: ArrayView2<f64>, y: ArrayView1<f64>, ki: &mut [f64]) {
        let sy = self.score_function.score(y);
        for (kij, xj) in ki.iter_mut().zip(x.outer_iter()) {
            *kij = self.evaluate(xj, y, &self.score_function.score(xj), &sy);
        }
    }

    fn diagonal(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.outer_iter()
            .map(|xi| {
                let si = self.score_function.score(xi);
                self.evaluate(xi, xi, &si, &si)
            })
            .collect()
    }

    fn length_scale(&self) -> Option<f64> {
        self.base_kernel.length_scale()
    }
}
