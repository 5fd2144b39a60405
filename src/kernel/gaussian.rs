//! Gaussian (squared exponential) kernel
use super::{squared_distance, DifferentiableKernel, Kernel};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Computes simple Gaussian kernel function.
pub fn kernel(xi: ArrayView1<f64>, xj: ArrayView1<f64>, gamma: f64) -> f64 {
    (-gamma * squared_distance(xi, xj)).exp()
}

/// The kernel `σ exp(-|x - y|² / (2ℓ²))`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SquaredExponentialKernel {
    /// Length scale ℓ
    pub length_scale: f64,
    /// Output scale σ
    pub output_scale: f64,
}

impl SquaredExponentialKernel {
    const DEFAULT_OUTPUT_SCALE: f64 = 1.0;

    /// Creates a [`SquaredExponentialKernel`] with unit output scale.
    pub fn new(length_scale: f64) -> Self {
        SquaredExponentialKernel {
            length_scale,
            output_scale: Self::DEFAULT_OUTPUT_SCALE,
        }
    }

    /// Sets the output scale.
    pub fn with_output_scale(mut self, output_scale: f64) -> Self {
        self.output_scale = output_scale;
        self
    }

    fn gamma(&self) -> f64 {
        0.5 / (self.length_scale * self.length_scale)
    }
}

impl Kernel for SquaredExponentialKernel {
    fn compute_elementwise(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        self.output_scale * kernel(x, y, self.gamma())
    }

    fn length_scale(&self) -> Option<f64> {
        Some(self.length_scale)
    }
}

impl DifferentiableKernel for SquaredExponentialKernel {
    fn grad_x(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        -self.grad_y(x, y)
    }

    fn grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        let kxy = self.compute_elementwise(x, y);
        (&x - &y) * (kxy / self.length_scale.powi(2))
    }

    fn divergence_x_grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let l2 = self.length_scale.powi(2);
        let d = x.len() as f64;
        let kxy = self.compute_elementwise(x, y);
        kxy * (d / l2 - squared_distance(x, y) / (l2 * l2))
    }
}
