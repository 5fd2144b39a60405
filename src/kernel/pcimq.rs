//! Pre-conditioned inverse multi-quadric kernel
use super::{squared_distance, DifferentiableKernel, Kernel};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// The kernel `σ / sqrt(1 + |x - y|² / (2ℓ²))`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PCIMQKernel {
    /// Length scale ℓ
    pub length_scale: f64,
    /// Output scale σ
    pub output_scale: f64,
}

impl PCIMQKernel {
    /// Creates a [`PCIMQKernel`] with unit output scale.
    pub fn new(length_scale: f64) -> Self {
        PCIMQKernel {
            length_scale,
            output_scale: 1.0,
        }
    }

    /// Sets the output scale.
    pub fn with_output_scale(mut self, output_scale: f64) -> Self {
        self.output_scale = output_scale;
        self
    }

    fn base(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        1.0 + 0.5 * squared_distance(x, y) / self.length_scale.powi(2)
    }
}

impl Kernel for PCIMQKernel {
    fn compute_elementwise(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        self.output_scale / self.base(x, y).sqrt()
    }

    fn length_scale(&self) -> Option<f64> {
        Some(self.length_scale)
    }
}

impl DifferentiableKernel for PCIMQKernel {
    fn grad_x(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        -self.grad_y(x, y)
    }

    fn grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        let u = self.base(x, y);
        let scale = 0.5 * self.output_scale / self.length_scale.powi(2) * u.powf(-1.5);
        (&x - &y) * scale
    }

    fn divergence_x_grad_y(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let l2 = self.length_scale.powi(2);
        let d = x.len() as f64;
        let u = self.base(x, y);
        let r2 = squared_distance(x, y);
        self.output_scale * (0.5 * d / l2 * u.powf(-1.5) - 0.75 * r2 / (l2 * l2) * u.powf(-2.5))
    }
}
