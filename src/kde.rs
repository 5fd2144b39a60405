//! Weighted Gaussian kernel density estimation
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rulinalg::matrix::decomposition::PartialPivLu;
use rulinalg::matrix::Matrix;

use crate::error::{CoresetError, Result};

/// A Gaussian kernel density estimate with a full bandwidth matrix.
///
/// The bandwidth matrix is the weighted sample covariance scaled by `factor²`; without
/// an explicit factor Scott's rule `n_eff^(-1 / (d + 4))` is used.
pub struct GaussianKde {
    data: Array2<f64>,
    log_weights: Array1<f64>,
    inv_cov: Array2<f64>,
    log_norm: f64,
}

impl GaussianKde {
    /// Fits a [`GaussianKde`] to the rows of `x`.
    ///
    /// * `weights`: non-negative sample weights
    /// * `factor`: bandwidth factor, Scott's rule if `None`
    pub fn new(x: ArrayView2<f64>, weights: ArrayView1<f64>, factor: Option<f64>) -> Result<Self> {
        let (n, d) = x.dim();
        if weights.len() != n {
            return Err(CoresetError::ShapeMismatch(format!(
                "{} weights given for {} points",
                weights.len(),
                n
            )));
        }
        let total = weights.sum();
        if !(total > 0.0) {
            return Err(CoresetError::InvalidWeights(
                "kernel density weights must have a positive sum".to_string(),
            ));
        }
        let w = &weights / total;
        let sum_sq = w.dot(&w);
        let n_eff = 1.0 / sum_sq;
        let factor = factor.unwrap_or_else(|| n_eff.powf(-1.0 / (d as f64 + 4.0)));

        let mean = w.dot(&x);
        let denom = 1.0 - sum_sq;
        if !(denom > 0.0) {
            return Err(CoresetError::InvalidParameter(
                "kernel density estimation needs at least two effective samples".to_string(),
            ));
        }
        let mut cov = Matrix::<f64>::zeros(d, d);
        for (xi, &wi) in x.outer_iter().zip(w.iter()) {
            let di = &xi - &mean;
            for r in 0..d {
                for c in 0..d {
                    cov[[r, c]] += wi * di[r] * di[c];
                }
            }
        }
        let scale = factor * factor / denom;
        for r in 0..d {
            for c in 0..d {
                cov[[r, c]] *= scale;
            }
        }

        let lu = PartialPivLu::decompose(cov)
            .map_err(|err| CoresetError::LinearAlgebra(err.to_string()))?;
        let det = lu.det();
        if !(det > 0.0) {
            return Err(CoresetError::LinearAlgebra(
                "kernel density covariance is not positive definite".to_string(),
            ));
        }
        let inv = lu
            .inverse()
            .map_err(|err| CoresetError::LinearAlgebra(err.to_string()))?;
        let mut inv_cov = Array2::zeros((d, d));
        for r in 0..d {
            for c in 0..d {
                inv_cov[(r, c)] = inv[[r, c]];
            }
        }
        let log_norm = -0.5 * (d as f64 * (2.0 * std::f64::consts::PI).ln() + det.ln());

        Ok(GaussianKde {
            data: x.to_owned(),
            log_weights: w.mapv(f64::ln),
            inv_cov,
            log_norm,
        })
    }

    /// Evaluates the log-density at every row of `points`.
    pub fn logpdf(&self, points: ArrayView2<f64>) -> Array1<f64> {
        points
            .outer_iter()
            .map(|y| {
                let terms: Vec<f64> = self
                    .data
                    .outer_iter()
                    .zip(self.log_weights.iter())
                    .map(|(xi, &lw)| {
                        let d = &y - &xi;
                        lw - 0.5 * d.dot(&self.inv_cov.dot(&d))
                    })
                    .collect();
                log_sum_exp(&terms) + self.log_norm
            })
            .collect()
    }
}

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|&v| (v - max).exp()).sum::<f64>().ln()
}
