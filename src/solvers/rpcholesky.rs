//! Randomly pivoted Cholesky
use log::{debug, trace};
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{check_size, Solver};
use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::{CoresetError, Result};
use crate::kernel::{CachedKernel, Kernel};
use crate::random::{choice_weighted, RandomKey};

/// Cached intermediate results of [`RPCholesky`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RPCholeskyState {
    /// Kernel value of every point with itself
    pub gramian_diagonal: Array1<f64>,
}

/// Randomly pivoted Cholesky: stochastic greedy low-rank approximation of the Gram matrix.
///
/// Pivots are drawn with probability proportional to the diagonal of the residual
/// `K - F Fᵀ` of the current approximation, so poorly explained points are favoured.
pub struct RPCholesky<K: Kernel> {
    /// Number of points in the coresubset
    pub coreset_size: usize,
    /// Key for random number generation
    pub random_key: RandomKey,
    /// Kernel whose Gram matrix is approximated
    pub kernel: K,
    /// Whether every point may be selected at most once
    pub unique: bool,
}

impl<K: Kernel> RPCholesky<K> {
    /// Creates an [`RPCholesky`] solver.
    pub fn new(coreset_size: usize, random_key: RandomKey, kernel: K) -> Self {
        RPCholesky {
            coreset_size,
            random_key,
            kernel,
            unique: true,
        }
    }

    /// Sets whether indices must be unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    fn draw_pivot(&self, i: usize, residual: &Array1<f64>, chosen: &[usize]) -> Result<usize> {
        let mut rng = self.random_key.fold_in(i as u64).rng();
        if residual.sum() > 0.0 {
            return choice_weighted(&mut rng, residual.iter());
        }
        // the residual vanished: every point is explained equally well
        let candidates: Vec<usize> = (0..residual.len())
            .filter(|idx| !self.unique || !chosen.contains(idx))
            .collect();
        if candidates.is_empty() {
            return Err(CoresetError::Sampling(format!(
                "no pivot left to draw in step {i}"
            )));
        }
        debug!("step {}: residual diagonal vanished, drawing uniformly", i);
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }
}

impl<D: Dataset, K: Kernel> Solver<D> for RPCholesky<K> {
    type State = RPCholeskyState;

    fn reduce<'a>(
        &self,
        dataset: &'a D,
        state: Option<RPCholeskyState>,
    ) -> Result<(Coresubset<'a, D>, RPCholeskyState)> {
        let x = dataset.features();
        let n = dataset.len();
        let m = self.coreset_size;
        check_size(m, n, self.unique || n == 0)?;
        let gramian_diagonal = match state {
            Some(state) if state.gramian_diagonal.len() == n => state.gramian_diagonal,
            Some(state) => {
                return Err(CoresetError::ShapeMismatch(format!(
                    "cached diagonal has length {} but the dataset has {} points",
                    state.gramian_diagonal.len(),
                    n
                )))
            }
            None => self.kernel.diagonal(x),
        };
        debug!("randomly pivoted Cholesky selecting {} of {} points", m, n);

        let mut residual = gramian_diagonal.clone();
        let mut approximation = Array2::<f64>::zeros((n, m));
        let mut indices = Vec::with_capacity(m);
        let mut rows = CachedKernel::from(&self.kernel, x, if self.unique { 1 } else { m });
        for i in 0..m {
            let pivot = self.draw_pivot(i, &residual, &indices)?;
            trace!("step {}: pivot {} (residual {:.3e})", i, pivot, residual[pivot]);
            indices.push(pivot);

            // remove overlap with previously chosen columns
            let mut g = approximation.dot(&approximation.row(pivot));
            rows.use_rows(&[pivot], &mut |ki: Vec<&[f64]>| {
                for (gj, &kj) in g.iter_mut().zip(ki[0].iter()) {
                    *gj = kj - *gj;
                }
            });
            let g_pivot = g[pivot];
            if g_pivot > 0.0 {
                g /= g_pivot.sqrt();
            } else {
                g.fill(0.0);
            }

            // track diagonal of residual matrix and keep it non-negative
            for (rj, &gj) in residual.iter_mut().zip(g.iter()) {
                *rj = f64::max(*rj - gj * gj, 0.0);
            }
            if self.unique {
                residual[pivot] = 0.0;
            }
            approximation.column_mut(i).assign(&g);
        }
        Ok((
            Coresubset::new(indices, dataset)?,
            RPCholeskyState { gramian_diagonal },
        ))
    }
}
