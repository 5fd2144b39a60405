//! Score functions and their estimation from data
use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{CoresetError, Result};
use crate::kernel::squared_distance;

/// The gradient of the log-density of a distribution
pub trait ScoreFunction {
    /// Evaluates the score at `x`.
    fn score(&self, x: ArrayView1<f64>) -> Array1<f64>;

    /// Evaluates the diagonal of the Jacobian of the score at `x`.
    ///
    /// Defaults to central finite differences.
    fn jacobian_diagonal(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let mut diag = Array1::<f64>::zeros(x.len());
        let mut xp = x.to_owned();
        for k in 0..x.len() {
            let h = 1e-5 * f64::max(1.0, x[k].abs());
            xp[k] = x[k] + h;
            let sp = self.score(xp.view())[k];
            xp[k] = x[k] - h;
            let sm = self.score(xp.view())[k];
            xp[k] = x[k];
            diag[k] = (sp - sm) / (2.0 * h);
        }
        diag
    }
}

impl<S: ScoreFunction + ?Sized> ScoreFunction for &S {
    fn score(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (**self).score(x)
    }
    fn jacobian_diagonal(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (**self).jacobian_diagonal(x)
    }
}

impl<S: ScoreFunction + ?Sized> ScoreFunction for Box<S> {
    fn score(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (**self).score(x)
    }
    fn jacobian_diagonal(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (**self).jacobian_diagonal(x)
    }
}

fn point_key(x: ArrayView1<f64>) -> Vec<u64> {
    x.iter().map(|v| v.to_bits()).collect()
}

/// A score function whose values over a fixed set of points are computed once.
///
/// Points outside the set are passed on to the base score function.
pub struct CachedScore<S: ScoreFunction> {
    base: S,
    positions: HashMap<Vec<u64>, usize>,
    scores: Array2<f64>,
}

impl<S: ScoreFunction> CachedScore<S> {
    /// Evaluates `base` at every row of `points`.
    pub fn from(base: S, points: ArrayView2<f64>) -> Self {
        let (n, d) = points.dim();
        let mut positions = HashMap::with_capacity(n);
        let mut scores = Array2::zeros((n, d));
        for (pos, xi) in points.outer_iter().enumerate() {
            let key = point_key(xi);
            if positions.contains_key(&key) {
                continue;
            }
            scores.row_mut(pos).assign(&base.score(xi));
            positions.insert(key, pos);
        }
        CachedScore {
            base,
            positions,
            scores,
        }
    }

    /// Returns the number of distinct cached points.
    pub fn size(&self) -> usize {
        self.positions.len()
    }
}

impl<S: ScoreFunction> ScoreFunction for CachedScore<S> {
    fn score(&self, x: ArrayView1<f64>) -> Array1<f64> {
        match self.positions.get(&point_key(x)) {
            Some(&pos) => self.scores.row(pos).to_owned(),
            None => self.base.score(x),
        }
    }

    fn jacobian_diagonal(&self, x: ArrayView1<f64>) -> Array1<f64> {
        self.base.jacobian_diagonal(x)
    }
}

/// A procedure estimating a score function from (weighted) samples
pub trait ScoreMatching {
    /// Fits a score function to the rows of `x`.
    fn fit(&self, x: ArrayView2<f64>, weights: ArrayView1<f64>) -> Result<Box<dyn ScoreFunction>>;
}

/// A score function given in closed form
pub struct AnalyticScore<F>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    score_function: F,
}

impl<F> AnalyticScore<F>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    /// Wraps a closure evaluating the score.
    pub fn new(score_function: F) -> Self {
        AnalyticScore { score_function }
    }
}

impl<F> ScoreFunction for AnalyticScore<F>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    fn score(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (self.score_function)(x)
    }
}

/// Estimates the score as the gradient of the log of a Gaussian kernel density estimate
#[derive(Clone, Debug)]
pub struct KernelDensityMatching {
    /// Bandwidth of the Gaussian kernel
    pub length_scale: f64,
}

impl KernelDensityMatching {
    /// Creates a [`KernelDensityMatching`] struct.
    pub fn new(length_scale: f64) -> Self {
        KernelDensityMatching { length_scale }
    }
}

impl ScoreMatching for KernelDensityMatching {
    fn fit(&self, x: ArrayView2<f64>, weights: ArrayView1<f64>) -> Result<Box<dyn ScoreFunction>> {
        if !(self.length_scale > 0.0) {
            return Err(CoresetError::InvalidParameter(format!(
                "kernel density length scale must be positive, got {}",
                self.length_scale
            )));
        }
        if weights.len() != x.nrows() {
            return Err(CoresetError::ShapeMismatch(format!(
                "{} weights given for {} points",
                weights.len(),
                x.nrows()
            )));
        }
        Ok(Box::new(KernelDensityScore {
            data: x.to_owned(),
            weights: weights.to_owned(),
            length_scale: self.length_scale,
        }))
    }
}

/// Score of a Gaussian kernel density estimate
pub struct KernelDensityScore {
    data: Array2<f64>,
    weights: Array1<f64>,
    length_scale: f64,
}

impl KernelDensityScore {
    /// Returns the (shifted) kernel weights of all samples at `x` and the score.
    fn responsibilities(&self, x: ArrayView1<f64>) -> (Array1<f64>, f64, Array1<f64>) {
        let l2 = self.length_scale.powi(2);
        let exponents: Array1<f64> = self
            .data
            .outer_iter()
            .map(|xi| -0.5 * squared_distance(x, xi) / l2)
            .collect();
        let shift = exponents.fold(f64::NEG_INFINITY, |acc, &a| acc.max(a));
        let k: Array1<f64> = exponents
            .iter()
            .zip(self.weights.iter())
            .map(|(&a, &w)| w * (a - shift).exp())
            .collect();
        let total = k.sum();
        let mut score = Array1::<f64>::zeros(x.len());
        if total > 0.0 && total.is_finite() {
            for (xi, &ki) in self.data.outer_iter().zip(k.iter()) {
                score.scaled_add(ki / (total * l2), &(&xi - &x));
            }
        }
        (k, total, score)
    }
}

impl ScoreFunction for KernelDensityScore {
    fn score(&self, x: ArrayView1<f64>) -> Array1<f64> {
        self.responsibilities(x).2
    }

    fn jacobian_diagonal(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let l2 = self.length_scale.powi(2);
        let (k, total, score) = self.responsibilities(x);
        let mut diag = Array1::from_elem(x.len(), -1.0 / l2);
        if total > 0.0 && total.is_finite() {
            for (xi, &ki) in self.data.outer_iter().zip(k.iter()) {
                let d = &xi - &x;
                diag.scaled_add(ki / (total * l2 * l2), &d.mapv(|v| v * v));
            }
        }
        diag - score.mapv(|v| v * v)
    }
}
